//! The select-hierarchy operator.
//!
//! One entry point per direction. Each invocation re-layers the live scene,
//! walks from the current selection and optionally produces HUD feedback.

use lineage_core::{Error, Result};
use lineage_scene::{build_scene_layers, SceneGraph};

use crate::feedback::{FeedbackState, HudLabel};
use crate::preferences::SelectPreferences;
use crate::walker::{walk, Direction, TraversalResult, WalkPolicy};

/// Result of running the operator with feedback.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub result: TraversalResult,
    pub labels: Vec<HudLabel>,
}

/// Selects up or down the object hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectHierarchy {
    pub direction: Direction,
    pub policy: WalkPolicy,
}

impl SelectHierarchy {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            policy: WalkPolicy::for_direction(direction),
        }
    }

    pub fn up() -> Self {
        Self::new(Direction::Up)
    }

    pub fn down() -> Self {
        Self::new(Direction::Down)
    }

    /// Operator configured from user preferences.
    pub fn from_preferences(direction: Direction, prefs: &SelectPreferences) -> Self {
        Self {
            direction,
            policy: prefs.policy(direction),
        }
    }

    pub fn with_policy(mut self, policy: WalkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name for menus and undo history.
    pub fn label(&self) -> &'static str {
        match self.direction {
            Direction::Up => "Select Hierarchy Up",
            Direction::Down => "Select Hierarchy Down",
        }
    }

    /// The operator needs something selected to walk from.
    pub fn poll<S: SceneGraph + ?Sized>(scene: &S) -> bool {
        !scene.selected().is_empty()
    }

    /// Run one step on the live scene.
    ///
    /// # Errors
    ///
    /// [`Error::NothingSelected`] when the poll fails, plus anything layering
    /// or walking reports.
    pub fn execute<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<TraversalResult> {
        let selection = scene.selected();
        if selection.is_empty() {
            return Err(Error::NothingSelected);
        }

        let layers = build_scene_layers(&*scene)?;
        log::info!(
            "{} from {} object(s) over {} layer(s)",
            self.label(),
            selection.len(),
            layers.len()
        );

        walk(scene, self.direction, &selection, &layers, &self.policy)
    }

    /// Run one step and describe it for the HUD.
    pub fn execute_with_feedback<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        feedback: &mut FeedbackState,
        prefs: &SelectPreferences,
    ) -> Result<Outcome> {
        let result = self.execute(scene)?;
        let labels = feedback.describe(self.direction, &self.policy, &result, &prefs.hud);
        Ok(Outcome { result, labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::BoundaryKind;
    use lineage_scene::Scene;

    #[test]
    fn test_poll_requires_selection() {
        let mut scene = Scene::new("empty");
        let cube = scene.spawn("Cube").unwrap();
        assert!(!SelectHierarchy::poll(&scene));
        assert!(matches!(
            SelectHierarchy::down().execute(&mut scene),
            Err(Error::NothingSelected)
        ));

        scene.select_only(&[cube]).unwrap();
        assert!(SelectHierarchy::poll(&scene));
    }

    #[test]
    fn test_direction_defaults() {
        assert!(SelectHierarchy::up().policy.recursive);
        assert!(!SelectHierarchy::down().policy.recursive);
        assert_eq!(SelectHierarchy::up().label(), "Select Hierarchy Up");
    }

    #[test]
    fn test_from_preferences() {
        let mut prefs = SelectPreferences::default();
        prefs.down.unhide = true;
        let op = SelectHierarchy::from_preferences(Direction::Down, &prefs);
        assert!(op.policy.unhide);
        assert_eq!(op.direction, Direction::Down);
    }

    #[test]
    fn test_execute_with_feedback() {
        let mut scene = Scene::new("solo");
        let cube = scene.spawn("Cube").unwrap();
        scene.select_only(&[cube]).unwrap();

        let mut feedback = FeedbackState::new();
        let outcome = SelectHierarchy::down()
            .execute_with_feedback(&mut scene, &mut feedback, &SelectPreferences::default())
            .unwrap();

        assert_eq!(outcome.result, TraversalResult::Boundary(BoundaryKind::AbsoluteBottom));
        assert_eq!(outcome.labels[0].text(), "Reached ABSOLUTE Bottom of Hierarchy");
        assert_eq!(feedback.last_boundary(), Some(BoundaryKind::AbsoluteBottom));
    }
}
