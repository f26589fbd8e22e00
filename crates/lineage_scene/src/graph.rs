//! The scene graph interface consumed by hierarchy traversal.
//!
//! A host application exposes its live object graph through [`SceneGraph`].
//! Everything in this workspace reads and mutates the scene exclusively
//! through this trait, so the traversal logic never needs to know how the
//! host stores objects.

use std::collections::{HashSet, VecDeque};

use lineage_core::{Error, ObjectId, Result};

/// Read/write access to a host scene graph.
///
/// Implementations are expected to be cheap to query. Lookups for ids the
/// scene does not know return `None`/`false`/empty; mutations of unknown ids
/// return [`Error::ObjectNotFound`].
pub trait SceneGraph {
    /// All objects eligible for traversal, in a stable order.
    ///
    /// For a host this is typically the current view layer's object set.
    fn working_universe(&self) -> Vec<ObjectId>;

    /// Direct parent of `id`.
    fn parent(&self, id: ObjectId) -> Option<ObjectId>;

    /// Direct children of `id`.
    fn children(&self, id: ObjectId) -> Vec<ObjectId>;

    /// Whether `id` is currently visible (and therefore selectable).
    fn is_visible(&self, id: ObjectId) -> bool;

    /// Show or hide `id`.
    fn set_visible(&mut self, id: ObjectId, visible: bool) -> Result<()>;

    /// Whether `id` carries the selection flag.
    fn is_selected(&self, id: ObjectId) -> bool;

    /// Set the selection flag of `id`.
    fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()>;

    /// Currently selected objects.
    ///
    /// Hidden objects never count as selected.
    fn selected(&self) -> Vec<ObjectId> {
        self.working_universe()
            .into_iter()
            .filter(|&id| self.is_selected(id) && self.is_visible(id))
            .collect()
    }

    /// The active object, if any.
    fn active(&self) -> Option<ObjectId>;

    /// Make `id` the active object.
    fn set_active(&mut self, id: ObjectId) -> Result<()>;

    /// Whether `id` is tagged as a group container.
    fn is_group_marker(&self, id: ObjectId) -> bool;

    /// Objects referenced by `id`'s modifiers that are shown in the viewport.
    fn modifier_targets(&self, id: ObjectId) -> Vec<ObjectId>;

    /// Whether selecting a group marker automatically selects its children.
    fn group_auto_select_enabled(&self) -> bool;

    /// Parent chain of `id`, nearest parent first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHierarchy`] if the chain loops.
    fn ancestors(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);

        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            if !seen.insert(parent) {
                return Err(Error::MalformedHierarchy { objects: chain });
            }
            current = parent;
        }

        Ok(chain)
    }

    /// All transitive children of `id`, breadth-first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHierarchy`] if an object is reached twice.
    fn descendants(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);

        let mut queue: VecDeque<ObjectId> = self.children(id).into();
        while let Some(child) = queue.pop_front() {
            if !seen.insert(child) {
                return Err(Error::MalformedHierarchy {
                    objects: vec![id, child],
                });
            }
            found.push(child);
            queue.extend(self.children(child));
        }

        Ok(found)
    }
}
