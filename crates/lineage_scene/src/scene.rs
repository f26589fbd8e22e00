//! In-memory scene implementing [`SceneGraph`].
//!
//! Mirrors the pieces of a host scene that hierarchy selection cares about:
//! parent links, hide flags, view-layer membership, selection, the active
//! object, group markers and modifier targets.

use std::collections::HashMap;

use lineage_core::prelude::*;

use crate::graph::SceneGraph;

/// A modifier that may reference another object (mirror, boolean, array...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub target: Option<ObjectId>,
    /// Whether the modifier is enabled in the viewport
    pub show_viewport: bool,
}

impl Modifier {
    pub fn new(name: impl Into<String>, target: Option<ObjectId>) -> Self {
        Self {
            name: name.into(),
            target,
            show_viewport: true,
        }
    }
}

/// A single object in the scene.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub parent: Option<ObjectId>,
    pub hidden: bool,
    pub in_view_layer: bool,
    pub selected: bool,
    /// Tagged as a group container
    pub group: bool,
    pub modifiers: Vec<Modifier>,
}

impl SceneObject {
    fn new(id: ObjectId, name: String) -> Self {
        Self {
            id,
            name,
            parent: None,
            hidden: false,
            in_view_layer: true,
            selected: false,
            group: false,
            modifiers: Vec::new(),
        }
    }

    /// Visible means part of the view layer and not hidden.
    pub fn is_visible(&self) -> bool {
        self.in_view_layer && !self.hidden
    }
}

/// Scene-level group policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneSettings {
    /// Selecting a group marker selects its children
    pub group_select: bool,
    /// Group auto-select descends into all descendants, not just direct children
    pub group_recursive_select: bool,
}

/// An in-memory scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    name: String,
    /// Objects in creation order
    objects: Vec<SceneObject>,
    index: HashMap<ObjectId, usize>,
    names: HashMap<String, ObjectId>,
    active: Option<ObjectId>,
    ids: IdGenerator,
    pub settings: SceneSettings,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Create a new root object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateObject`] if the name is taken.
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<ObjectId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(Error::DuplicateObject(name));
        }

        let id = self.ids.next();
        self.index.insert(id, self.objects.len());
        self.names.insert(name.clone(), id);
        self.objects.push(SceneObject::new(id, name));
        Ok(id)
    }

    /// Create a new object parented to `parent`.
    pub fn spawn_child(&mut self, name: impl Into<String>, parent: ObjectId) -> Result<ObjectId> {
        self.get(parent)?;
        let id = self.spawn(name)?;
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Set or clear an object's parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHierarchy`] if `parent` is `child` itself or
    /// one of its descendants.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> Result<()> {
        self.get(child)?;

        if let Some(parent) = parent {
            self.get(parent)?;
            if parent == child || self.ancestors(parent)?.contains(&child) {
                return Err(Error::MalformedHierarchy {
                    objects: vec![child, parent],
                });
            }
        }

        self.get_mut(child)?.parent = parent;
        Ok(())
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.objects[i]),
            None => None,
        }
    }

    fn get(&self, id: ObjectId) -> Result<&SceneObject> {
        self.object(id).ok_or(Error::ObjectNotFound(id))
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.object_mut(id).ok_or(Error::ObjectNotFound(id))
    }

    /// Look up an object by name.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    /// Look up an object by name, failing if it does not exist.
    pub fn lookup(&self, name: &str) -> Result<ObjectId> {
        self.find(name)
            .ok_or_else(|| Error::UnknownObject(name.to_string()))
    }

    pub fn name_of(&self, id: ObjectId) -> Option<&str> {
        self.object(id).map(|o| o.name.as_str())
    }

    /// Names for a list of ids, skipping unknown ones.
    pub fn names_of<'a>(&'a self, ids: impl IntoIterator<Item = &'a ObjectId>) -> Vec<&'a str> {
        ids.into_iter().filter_map(|&id| self.name_of(id)).collect()
    }

    /// All objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Hide or unhide an object. Hiding also deselects it.
    pub fn set_hidden(&mut self, id: ObjectId, hidden: bool) -> Result<()> {
        let object = self.get_mut(id)?;
        object.hidden = hidden;
        if hidden {
            object.selected = false;
        }
        Ok(())
    }

    /// Add or remove an object from the view layer.
    pub fn set_in_view_layer(&mut self, id: ObjectId, in_view_layer: bool) -> Result<()> {
        self.get_mut(id)?.in_view_layer = in_view_layer;
        Ok(())
    }

    /// Tag an object as a group container.
    pub fn set_group(&mut self, id: ObjectId, group: bool) -> Result<()> {
        self.get_mut(id)?.group = group;
        Ok(())
    }

    pub fn add_modifier(&mut self, id: ObjectId, modifier: Modifier) -> Result<()> {
        if let Some(target) = modifier.target {
            self.get(target)?;
        }
        self.get_mut(id)?.modifiers.push(modifier);
        Ok(())
    }

    /// Replace the selection with `ids`; the last one becomes active.
    pub fn select_only(&mut self, ids: &[ObjectId]) -> Result<()> {
        for &id in ids {
            self.get(id)?;
        }
        self.deselect_all();
        for &id in ids {
            self.get_mut(id)?.selected = true;
        }
        if let Some(&last) = ids.last() {
            self.active = Some(last);
        }
        Ok(())
    }

    pub fn deselect_all(&mut self) {
        for object in &mut self.objects {
            object.selected = false;
        }
    }
}

impl SceneGraph for Scene {
    fn working_universe(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.in_view_layer)
            .map(|o| o.id)
            .collect()
    }

    fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).and_then(|o| o.parent)
    }

    fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.parent == Some(id))
            .map(|o| o.id)
            .collect()
    }

    fn is_visible(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(SceneObject::is_visible)
    }

    fn set_visible(&mut self, id: ObjectId, visible: bool) -> Result<()> {
        self.set_hidden(id, !visible)
    }

    fn is_selected(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.selected)
    }

    fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()> {
        self.get_mut(id)?.selected = selected;
        Ok(())
    }

    fn active(&self) -> Option<ObjectId> {
        self.active
    }

    fn set_active(&mut self, id: ObjectId) -> Result<()> {
        self.get(id)?;
        self.active = Some(id);
        Ok(())
    }

    fn is_group_marker(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.group)
    }

    fn modifier_targets(&self, id: ObjectId) -> Vec<ObjectId> {
        self.object(id)
            .map(|o| {
                o.modifiers
                    .iter()
                    .filter(|m| m.show_viewport)
                    .filter_map(|m| m.target)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn group_auto_select_enabled(&self) -> bool {
        self.settings.group_select
    }
}
