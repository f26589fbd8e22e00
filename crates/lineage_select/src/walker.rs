//! Hierarchy walking.
//!
//! Moves a selection one step up (towards the roots) or down (towards the
//! leaves) of the object hierarchy:
//!
//! ```text
//! selection → candidates → [unhide] → visible / hidden → reselect → compare
//! ```
//!
//! When nothing changes the walk reports which boundary it ran into, and
//! whether hidden objects are what stopped it.

use std::fmt;
use std::str::FromStr;

use lineage_core::{Error, ObjectId, Result};
use lineage_scene::{HierarchyLayers, SceneGraph};

use crate::active::resolve_active;
use crate::frontier::Frontier;

/// Direction of a hierarchy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the parents
    Up,
    /// Towards the children
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "up" | "parents" => Ok(Self::Up),
            "down" | "children" => Ok(Self::Down),
            _ => Err(Error::Parse(format!("Unknown direction: {}", s))),
        }
    }
}

/// Flags controlling a single hierarchy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkPolicy {
    /// Collect all ancestors/descendants instead of one generation
    pub recursive: bool,
    /// Keep the original selection
    pub include_selection: bool,
    /// Treat modifier targets as children (down only)
    pub include_modifier_targets: bool,
    /// Unhide hidden candidates before selecting
    pub unhide: bool,
}

impl WalkPolicy {
    /// Defaults for stepping up: straight to the top.
    pub const fn up() -> Self {
        Self {
            recursive: true,
            include_selection: false,
            include_modifier_targets: false,
            unhide: false,
        }
    }

    /// Defaults for stepping down: one generation at a time.
    pub const fn down() -> Self {
        Self {
            recursive: false,
            include_selection: false,
            include_modifier_targets: false,
            unhide: false,
        }
    }

    pub const fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::up(),
            Direction::Down => Self::down(),
        }
    }

    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub const fn include_selection(mut self, include: bool) -> Self {
        self.include_selection = include;
        self
    }

    pub const fn include_modifier_targets(mut self, include: bool) -> Self {
        self.include_modifier_targets = include;
        self
    }

    pub const fn unhide(mut self, unhide: bool) -> Self {
        self.unhide = unhide;
        self
    }
}

/// Where a walk got stuck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Only hidden parents remain above
    Top,
    /// No parents at all
    AbsoluteTop,
    /// Only hidden children remain below
    Bottom,
    /// No children at all
    AbsoluteBottom,
}

impl BoundaryKind {
    fn reached(direction: Direction, blocked_by_hidden: bool) -> Self {
        match (direction, blocked_by_hidden) {
            (Direction::Up, true) => Self::Top,
            (Direction::Up, false) => Self::AbsoluteTop,
            (Direction::Down, true) => Self::Bottom,
            (Direction::Down, false) => Self::AbsoluteBottom,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Top | Self::AbsoluteTop => Direction::Up,
            Self::Bottom | Self::AbsoluteBottom => Direction::Down,
        }
    }

    /// True when no hidden objects are left in this direction either.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::AbsoluteTop | Self::AbsoluteBottom)
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::AbsoluteTop => write!(f, "absolute top"),
            Self::Bottom => write!(f, "bottom"),
            Self::AbsoluteBottom => write!(f, "absolute bottom"),
        }
    }
}

/// Outcome of a hierarchy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalResult {
    /// The selection moved; `active` is set when the active object changed
    Continued { active: Option<ObjectId> },
    /// Nothing moved
    Boundary(BoundaryKind),
}

impl TraversalResult {
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Boundary(_))
    }

    pub fn boundary(&self) -> Option<BoundaryKind> {
        match self {
            Self::Boundary(kind) => Some(*kind),
            Self::Continued { .. } => None,
        }
    }
}

/// Applies scene mutations, counting them so a failure can report how far
/// the step got.
struct Mutations<'s, S: ?Sized> {
    scene: &'s mut S,
    applied: usize,
}

impl<'s, S: SceneGraph + ?Sized> Mutations<'s, S> {
    fn new(scene: &'s mut S) -> Self {
        Self { scene, applied: 0 }
    }

    fn track(&mut self, result: Result<()>) -> Result<()> {
        result.map_err(|e| e.aborted_after(self.applied))?;
        self.applied += 1;
        Ok(())
    }

    fn set_visible(&mut self, id: ObjectId) -> Result<()> {
        let result = self.scene.set_visible(id, true);
        self.track(result)
    }

    fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()> {
        let result = self.scene.set_selected(id, selected);
        self.track(result)
    }

    fn set_active(&mut self, id: ObjectId) -> Result<()> {
        let result = self.scene.set_active(id);
        self.track(result)
    }
}

/// Step the selection one move in `direction`.
///
/// `selection` is the set to walk from, normally the scene's current
/// selection. `layers` must be built from the scene's current state.
///
/// Mutations are applied in place. If one fails, the walk stops and returns
/// [`Error::MutationAborted`]; earlier mutations stay applied.
pub fn walk<S: SceneGraph + ?Sized>(
    scene: &mut S,
    direction: Direction,
    selection: &[ObjectId],
    layers: &HierarchyLayers,
    policy: &WalkPolicy,
) -> Result<TraversalResult> {
    let origin: Frontier = selection.iter().copied().collect();
    let before: Frontier = scene.selected().into_iter().collect();

    let candidates = collect_candidates(&*scene, direction, &origin, layers, policy)?;

    let mut mutations = Mutations::new(scene);

    if policy.unhide {
        for id in candidates.iter() {
            if !mutations.scene.is_visible(id) {
                mutations.set_visible(id)?;
            }
        }
    }

    let (visible, hidden) = candidates.partition(|id| mutations.scene.is_visible(id));
    log::debug!(
        "Walking {}: {} visible, {} hidden candidate(s) from {} object(s)",
        direction,
        visible.len(),
        hidden.len(),
        origin.len()
    );

    // Deselect first: objects picked up again below may belong to the
    // original selection when it spans several layers. Never deselect
    // without a replacement, the selection must not end up empty.
    if !policy.include_selection && !visible.is_empty() {
        if direction == Direction::Up && group_auto_select_active(&*mutations.scene) {
            // Group auto-select would re-add the children right away and
            // hide the fact that nothing moved.
            log::debug!("Keeping selection: active group auto-selects its children");
        } else {
            for id in origin.iter() {
                mutations.set_selected(id, false)?;
            }
        }
    }

    for id in visible.iter() {
        mutations.set_selected(id, true)?;
    }

    let after: Frontier = mutations.scene.selected().into_iter().collect();
    if after.same_members(&before) {
        let kind = BoundaryKind::reached(direction, !hidden.is_empty());
        log::debug!("Reached {} of hierarchy", kind);
        return Ok(TraversalResult::Boundary(kind));
    }

    let mut new_active = None;
    if let Some(active) = mutations.scene.active() {
        if let Some(pick) = resolve_active(&*mutations.scene, layers, &visible, active) {
            mutations.set_active(pick)?;
            new_active = Some(pick);
        }
    }

    Ok(TraversalResult::Continued { active: new_active })
}

/// Step up from `selection`.
pub fn select_up<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &[ObjectId],
    layers: &HierarchyLayers,
    policy: &WalkPolicy,
) -> Result<TraversalResult> {
    walk(scene, Direction::Up, selection, layers, policy)
}

/// Step down from `selection`.
pub fn select_down<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &[ObjectId],
    layers: &HierarchyLayers,
    policy: &WalkPolicy,
) -> Result<TraversalResult> {
    walk(scene, Direction::Down, selection, layers, policy)
}

fn group_auto_select_active<S: SceneGraph + ?Sized>(scene: &S) -> bool {
    scene.group_auto_select_enabled()
        && scene.active().is_some_and(|active| scene.is_group_marker(active))
}

/// Parents or children of `origin`, restricted to the layered universe.
fn collect_candidates<S: SceneGraph + ?Sized>(
    scene: &S,
    direction: Direction,
    origin: &Frontier,
    layers: &HierarchyLayers,
    policy: &WalkPolicy,
) -> Result<Frontier> {
    let mut candidates = Frontier::new();

    for id in origin.iter() {
        let related = match (direction, policy.recursive) {
            (Direction::Up, true) => scene.ancestors(id)?,
            (Direction::Up, false) => scene.parent(id).into_iter().collect(),
            (Direction::Down, true) => scene.descendants(id)?,
            (Direction::Down, false) => scene.children(id),
        };
        candidates.extend(related.into_iter().filter(|&o| layers.contains(o)));

        if direction == Direction::Down && policy.include_modifier_targets {
            candidates.extend(
                scene
                    .modifier_targets(id)
                    .into_iter()
                    .filter(|&o| layers.contains(o)),
            );
        }
    }

    Ok(candidates)
}
