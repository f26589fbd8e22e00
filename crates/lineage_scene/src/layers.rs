//! Hierarchy layering.
//!
//! Sorts a set of objects into generations based on their parent/child
//! relationships: layer 0 holds the roots, layer `k` the objects whose parent
//! chain to a root (inside the set) has length `k`.
//!
//! Layers are never cached. Every traversal rebuilds them from the live
//! scene, since unhiding or reparenting in between invalidates them.

use std::collections::{HashMap, HashSet};

use lineage_core::{Error, ObjectId, Result};

use crate::graph::SceneGraph;

/// Objects of a universe, partitioned by depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyLayers {
    layers: Vec<Vec<ObjectId>>,
    depth: HashMap<ObjectId, usize>,
}

impl HierarchyLayers {
    /// Number of layers. Always at least one.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the universe was empty.
    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Total number of layered objects.
    pub fn object_count(&self) -> usize {
        self.depth.len()
    }

    pub fn layer(&self, depth: usize) -> Option<&[ObjectId]> {
        self.layers.get(depth).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[ObjectId]> {
        self.layers.iter().map(Vec::as_slice)
    }

    /// Depth of `id`, or `None` if it is not part of the universe.
    pub fn depth_of(&self, id: ObjectId) -> Option<usize> {
        self.depth.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.depth.contains_key(&id)
    }

    /// Objects of the shallowest layer that has at least one member matching
    /// `keep`, filtered to those members, in layer order.
    pub fn first_intersecting(&self, mut keep: impl FnMut(ObjectId) -> bool) -> Option<Vec<ObjectId>> {
        self.layers.iter().find_map(|layer| {
            let hits: Vec<ObjectId> = layer.iter().copied().filter(|&id| keep(id)).collect();
            (!hits.is_empty()).then_some(hits)
        })
    }
}

/// Partition `universe` into hierarchy layers.
///
/// Objects whose parent lies outside `universe` are treated as roots, which
/// bounds the layering to the supplied set. An empty universe yields a single
/// empty layer.
///
/// # Errors
///
/// Returns [`Error::MalformedHierarchy`] if an object is reached from two
/// parents, or if some objects can't be reached from any root because they
/// sit on (or below) a parent cycle.
pub fn build_layers<S: SceneGraph + ?Sized>(scene: &S, universe: &[ObjectId]) -> Result<HierarchyLayers> {
    let members: HashSet<ObjectId> = universe.iter().copied().collect();
    let mut depth = HashMap::with_capacity(members.len());

    let mut current = Vec::new();
    for &id in universe {
        let is_root = scene.parent(id).map_or(true, |p| !members.contains(&p));
        if is_root && depth.insert(id, 0).is_none() {
            current.push(id);
        }
    }

    let mut layers = Vec::new();
    loop {
        let mut next = Vec::new();
        for &id in &current {
            for child in scene.children(id) {
                if !members.contains(&child) {
                    continue;
                }
                if depth.insert(child, layers.len() + 1).is_some() {
                    return Err(Error::MalformedHierarchy {
                        objects: vec![id, child],
                    });
                }
                next.push(child);
            }
        }

        layers.push(current);
        if next.is_empty() {
            break;
        }
        current = next;
    }

    if depth.len() < members.len() {
        let mut unplaced = Vec::new();
        for &id in universe {
            if !depth.contains_key(&id) && !unplaced.contains(&id) {
                unplaced.push(id);
            }
        }
        return Err(Error::MalformedHierarchy { objects: unplaced });
    }

    log::trace!(
        "Built {} hierarchy layer(s) over {} object(s)",
        layers.len(),
        depth.len()
    );

    Ok(HierarchyLayers { layers, depth })
}

/// Layer the scene's whole working universe.
pub fn build_scene_layers<S: SceneGraph + ?Sized>(scene: &S) -> Result<HierarchyLayers> {
    build_layers(scene, &scene.working_universe())
}
