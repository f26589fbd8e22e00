//! Active-object resolution after a hierarchy step.

use lineage_core::ObjectId;
use lineage_scene::{HierarchyLayers, SceneGraph};

use crate::frontier::Frontier;

/// Pick the object that should become active after selecting `visible`.
///
/// The new top level is the shallowest hierarchy layer containing any of the
/// newly selected objects. If `active` is already part of it nothing
/// changes and `None` is returned. Otherwise a group marker from the top
/// level is preferred, falling back to its first object. Ties resolve in
/// layer order, so the result never depends on hash ordering.
pub fn resolve_active<S: SceneGraph + ?Sized>(
    scene: &S,
    layers: &HierarchyLayers,
    visible: &Frontier,
    active: ObjectId,
) -> Option<ObjectId> {
    let top_level = layers.first_intersecting(|id| visible.contains(id))?;

    if top_level.contains(&active) {
        return None;
    }

    top_level
        .iter()
        .copied()
        .find(|&id| scene.is_group_marker(id))
        .or_else(|| top_level.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_scene::{build_scene_layers, Scene};

    fn row() -> (Scene, ObjectId, [ObjectId; 3]) {
        let mut scene = Scene::new("row");
        let root = scene.spawn("Root").unwrap();
        let a = scene.spawn_child("A", root).unwrap();
        let b = scene.spawn_child("B", root).unwrap();
        let c = scene.spawn_child("C", root).unwrap();
        (scene, root, [a, b, c])
    }

    #[test]
    fn test_group_marker_preferred() {
        let (mut scene, root, [a, b, c]) = row();
        scene.set_group(c, true).unwrap();
        let layers = build_scene_layers(&scene).unwrap();

        let visible: Frontier = [a, b, c].into_iter().collect();
        assert_eq!(resolve_active(&scene, &layers, &visible, root), Some(c));

        // Insertion order of the candidates doesn't matter
        let reversed: Frontier = [c, b, a].into_iter().collect();
        assert_eq!(resolve_active(&scene, &layers, &reversed, root), Some(c));
    }

    #[test]
    fn test_first_group_marker_in_layer_order() {
        let (mut scene, root, [a, b, c]) = row();
        scene.set_group(b, true).unwrap();
        scene.set_group(c, true).unwrap();
        let layers = build_scene_layers(&scene).unwrap();

        let visible: Frontier = [c, a, b].into_iter().collect();
        assert_eq!(resolve_active(&scene, &layers, &visible, root), Some(b));
    }

    #[test]
    fn test_active_already_on_top_level() {
        let (scene, _, [a, b, _]) = row();
        let layers = build_scene_layers(&scene).unwrap();
        let visible: Frontier = [a, b].into_iter().collect();
        assert_eq!(resolve_active(&scene, &layers, &visible, b), None);
    }

    #[test]
    fn test_shallowest_layer_wins() {
        let (mut scene, root, [a, ..]) = row();
        let deep = scene.spawn_child("Deep", a).unwrap();
        let layers = build_scene_layers(&scene).unwrap();

        let visible: Frontier = [deep, a].into_iter().collect();
        assert_eq!(resolve_active(&scene, &layers, &visible, root), Some(a));
    }

    #[test]
    fn test_nothing_visible_keeps_active() {
        let (scene, root, _) = row();
        let layers = build_scene_layers(&scene).unwrap();
        assert_eq!(resolve_active(&scene, &layers, &Frontier::new(), root), None);
    }
}
