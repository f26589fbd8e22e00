//! Undoable selection commands.
//!
//! Hierarchy steps mutate the scene in place without rollback. Undo works
//! the way a host does it: snapshot the selection state before the step and
//! restore it wholesale.

use lineage_core::{ObjectId, Result};
use lineage_scene::{sync_group_selection, SceneGraph};

use crate::operator::SelectHierarchy;
use crate::walker::TraversalResult;

/// Result type for command execution.
pub type CommandResult = Result<()>;

/// A command that can be executed, undone, and redone.
pub trait Command<S: SceneGraph> {
    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str;

    /// Execute the command, modifying the scene.
    fn execute(&mut self, scene: &mut S) -> CommandResult;

    /// Undo the command, restoring the previous state.
    fn undo(&mut self, scene: &mut S) -> CommandResult;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ObjectState {
    id: ObjectId,
    visible: bool,
    selected: bool,
}

/// Selection, visibility and active object of a scene's working universe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneSnapshot {
    objects: Vec<ObjectState>,
    active: Option<ObjectId>,
}

impl SceneSnapshot {
    pub fn capture<S: SceneGraph + ?Sized>(scene: &S) -> Self {
        let objects = scene
            .working_universe()
            .into_iter()
            .map(|id| ObjectState {
                id,
                visible: scene.is_visible(id),
                selected: scene.is_selected(id),
            })
            .collect();

        Self {
            objects,
            active: scene.active(),
        }
    }

    /// Write the captured state back.
    ///
    /// Visibility is restored before selection so re-hidden objects can't
    /// keep a selection they didn't have.
    pub fn restore<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<()> {
        for state in &self.objects {
            if scene.is_visible(state.id) != state.visible {
                scene.set_visible(state.id, state.visible)?;
            }
        }
        for state in &self.objects {
            scene.set_selected(state.id, state.selected)?;
        }
        if let Some(active) = self.active {
            scene.set_active(active)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A hierarchy step wrapped for the undo history.
///
/// With [`with_group_sync`](Self::with_group_sync) the command also runs
/// group auto-select after the step, so the recorded after-state includes
/// the group children a host would add.
pub struct SelectHierarchyCommand {
    operator: SelectHierarchy,
    /// Recursive flag for group auto-select, `None` when not syncing
    group_sync: Option<bool>,
    before: Option<SceneSnapshot>,
    after: Option<SceneSnapshot>,
    result: Option<TraversalResult>,
}

impl SelectHierarchyCommand {
    pub fn new(operator: SelectHierarchy) -> Self {
        Self {
            operator,
            group_sync: None,
            before: None,
            after: None,
            result: None,
        }
    }

    /// Run group auto-select after each step.
    pub fn with_group_sync(mut self, recursive: bool) -> Self {
        self.group_sync = Some(recursive);
        self
    }

    /// Result of the last execution.
    pub fn result(&self) -> Option<TraversalResult> {
        self.result
    }

    fn step<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<TraversalResult> {
        let result = self.operator.execute(scene)?;
        if let Some(recursive) = self.group_sync {
            let grouped = sync_group_selection(scene, recursive)?;
            if !grouped.is_empty() {
                log::debug!("Group auto-select added {} object(s)", grouped.len());
            }
        }
        Ok(result)
    }
}

impl<S: SceneGraph> Command<S> for SelectHierarchyCommand {
    fn description(&self) -> &str {
        self.operator.label()
    }

    fn execute(&mut self, scene: &mut S) -> CommandResult {
        // Redo replays the recorded state instead of walking again from a
        // scene that may have been layered differently.
        if let Some(after) = &self.after {
            return after.restore(scene);
        }

        let before = SceneSnapshot::capture(&*scene);
        match self.step(scene) {
            Ok(result) => {
                self.result = Some(result);
                self.after = Some(SceneSnapshot::capture(&*scene));
                self.before = Some(before);
                Ok(())
            }
            Err(e) => {
                log::warn!("{} failed, restoring previous state: {}", self.operator.label(), e);
                if let Err(restore) = before.restore(scene) {
                    log::error!("Could not restore state after failed step: {}", restore);
                }
                Err(e)
            }
        }
    }

    fn undo(&mut self, scene: &mut S) -> CommandResult {
        match &self.before {
            Some(before) => before.restore(scene),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_scene::Scene;

    #[test]
    fn test_snapshot_restores_selection_and_visibility() {
        let mut scene = Scene::new("snap");
        let root = scene.spawn("Root").unwrap();
        let child = scene.spawn_child("Child", root).unwrap();
        scene.set_hidden(child, true).unwrap();
        scene.select_only(&[root]).unwrap();

        let snapshot = SceneSnapshot::capture(&scene);
        assert_eq!(snapshot.len(), 2);

        scene.set_hidden(child, false).unwrap();
        scene.select_only(&[child]).unwrap();

        snapshot.restore(&mut scene).unwrap();
        assert!(!scene.is_visible(child));
        assert_eq!(scene.selected(), vec![root]);
        assert_eq!(scene.active(), Some(root));
    }

    #[test]
    fn test_command_undo_and_redo() {
        let mut scene = Scene::new("cmd");
        let root = scene.spawn("Root").unwrap();
        let child = scene.spawn_child("Child", root).unwrap();
        scene.set_hidden(child, true).unwrap();
        scene.select_only(&[root]).unwrap();

        let op = SelectHierarchy::down().with_policy(crate::walker::WalkPolicy::down().unhide(true));
        let mut cmd = SelectHierarchyCommand::new(op);

        Command::<Scene>::execute(&mut cmd, &mut scene).unwrap();
        assert_eq!(scene.selected(), vec![child]);
        assert!(!cmd.result().unwrap().is_boundary());

        Command::<Scene>::undo(&mut cmd, &mut scene).unwrap();
        assert_eq!(scene.selected(), vec![root]);
        assert!(!scene.is_visible(child));

        Command::<Scene>::execute(&mut cmd, &mut scene).unwrap();
        assert_eq!(scene.selected(), vec![child]);
        assert_eq!(scene.active(), Some(child));
    }

    #[test]
    fn test_redo_keeps_group_children() {
        let mut scene = Scene::new("group");
        let group = scene.spawn("Group").unwrap();
        scene.set_group(group, true).unwrap();
        let kid = scene.spawn_child("Kid", group).unwrap();
        scene.settings.group_select = true;
        scene.select_only(&[kid]).unwrap();

        let mut cmd = SelectHierarchyCommand::new(SelectHierarchy::up()).with_group_sync(false);
        Command::<Scene>::execute(&mut cmd, &mut scene).unwrap();
        let forward = SceneSnapshot::capture(&scene);
        assert_eq!(scene.selected(), vec![group, kid]);
        assert_eq!(scene.active(), Some(group));

        Command::<Scene>::undo(&mut cmd, &mut scene).unwrap();
        assert_eq!(scene.selected(), vec![kid]);

        Command::<Scene>::execute(&mut cmd, &mut scene).unwrap();
        assert_eq!(SceneSnapshot::capture(&scene), forward);
    }

    #[test]
    fn test_failed_step_keeps_walk_error_when_restore_fails() {
        /// Refuses every selection change once the walk has started.
        struct Frozen {
            inner: Scene,
            writes: usize,
        }

        impl SceneGraph for Frozen {
            fn working_universe(&self) -> Vec<ObjectId> {
                self.inner.working_universe()
            }
            fn parent(&self, id: ObjectId) -> Option<ObjectId> {
                self.inner.parent(id)
            }
            fn children(&self, id: ObjectId) -> Vec<ObjectId> {
                self.inner.children(id)
            }
            fn is_visible(&self, id: ObjectId) -> bool {
                self.inner.is_visible(id)
            }
            fn set_visible(&mut self, id: ObjectId, visible: bool) -> Result<()> {
                self.inner.set_visible(id, visible)
            }
            fn is_selected(&self, id: ObjectId) -> bool {
                self.inner.is_selected(id)
            }
            fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()> {
                self.writes += 1;
                if self.writes > 1 {
                    return Err(lineage_core::Error::ObjectNotFound(id));
                }
                self.inner.set_selected(id, selected)
            }
            fn active(&self) -> Option<ObjectId> {
                self.inner.active()
            }
            fn set_active(&mut self, id: ObjectId) -> Result<()> {
                self.inner.set_active(id)
            }
            fn is_group_marker(&self, id: ObjectId) -> bool {
                self.inner.is_group_marker(id)
            }
            fn modifier_targets(&self, id: ObjectId) -> Vec<ObjectId> {
                self.inner.modifier_targets(id)
            }
            fn group_auto_select_enabled(&self) -> bool {
                self.inner.group_auto_select_enabled()
            }
        }

        let mut inner = Scene::new("frozen");
        let root = inner.spawn("Root").unwrap();
        inner.spawn_child("Child", root).unwrap();
        inner.select_only(&[root]).unwrap();
        let mut scene = Frozen { inner, writes: 0 };

        let mut cmd = SelectHierarchyCommand::new(SelectHierarchy::down());
        let err = Command::<Frozen>::execute(&mut cmd, &mut scene).unwrap_err();

        // Deselecting Root went through, selecting Child failed
        assert!(matches!(
            err,
            lineage_core::Error::MutationAborted { applied: 1, .. }
        ));
        assert!(cmd.result().is_none());
    }
}
