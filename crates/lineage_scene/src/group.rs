//! Group auto-select.
//!
//! When a scene enables group auto-select, selecting a group marker pulls
//! its children into the selection. Hosts run this as a deferred step after
//! every scene update; [`sync_group_selection`] is that step.

use lineage_core::{ObjectId, Result};

use crate::graph::SceneGraph;

/// Select the visible children of `group` that aren't selected yet.
///
/// With `recursive`, all descendants are considered, otherwise only direct
/// children. Only objects in the working universe are touched. Returns the
/// newly selected objects.
pub fn select_group_children<S: SceneGraph + ?Sized>(
    scene: &mut S,
    group: ObjectId,
    recursive: bool,
) -> Result<Vec<ObjectId>> {
    let universe = scene.working_universe();
    let members = if recursive {
        scene.descendants(group)?
    } else {
        scene.children(group)
    };

    let pending: Vec<ObjectId> = members
        .into_iter()
        .filter(|id| universe.contains(id))
        .filter(|&id| scene.is_visible(id) && !scene.is_selected(id))
        .collect();

    for &id in &pending {
        scene.set_selected(id, true)?;
    }

    Ok(pending)
}

/// Run group auto-select for the active object.
///
/// Does nothing unless auto-select is enabled and the active object is a
/// selected group marker.
pub fn sync_group_selection<S: SceneGraph + ?Sized>(scene: &mut S, recursive: bool) -> Result<Vec<ObjectId>> {
    if !scene.group_auto_select_enabled() {
        return Ok(Vec::new());
    }

    let group = match scene.active() {
        Some(active)
            if scene.is_group_marker(active)
                && scene.is_selected(active)
                && scene.is_visible(active) =>
        {
            active
        }
        _ => return Ok(Vec::new()),
    };

    let added = select_group_children(scene, group, recursive)?;
    if !added.is_empty() {
        log::debug!("Group {} auto-selected {} object(s)", group, added.len());
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn grouped() -> (Scene, ObjectId, ObjectId, ObjectId, ObjectId) {
        let mut scene = Scene::new("groups");
        let group = scene.spawn("Group").unwrap();
        scene.set_group(group, true).unwrap();
        let a = scene.spawn_child("A", group).unwrap();
        let b = scene.spawn_child("B", group).unwrap();
        let nested = scene.spawn_child("Nested", a).unwrap();
        scene.settings.group_select = true;
        (scene, group, a, b, nested)
    }

    #[test]
    fn test_sync_selects_direct_children() {
        let (mut scene, group, a, b, nested) = grouped();
        scene.select_only(&[group]).unwrap();

        let added = sync_group_selection(&mut scene, false).unwrap();
        assert_eq!(added, vec![a, b]);
        assert!(!scene.is_selected(nested));
    }

    #[test]
    fn test_sync_recursive() {
        let (mut scene, group, a, b, nested) = grouped();
        scene.select_only(&[group]).unwrap();

        let added = sync_group_selection(&mut scene, true).unwrap();
        assert_eq!(added, vec![a, b, nested]);
    }

    #[test]
    fn test_sync_skips_hidden_and_disabled() {
        let (mut scene, group, a, b, _) = grouped();
        scene.set_hidden(b, true).unwrap();
        scene.select_only(&[group]).unwrap();
        assert_eq!(sync_group_selection(&mut scene, false).unwrap(), vec![a]);

        scene.settings.group_select = false;
        scene.select_only(&[group]).unwrap();
        assert!(sync_group_selection(&mut scene, false).unwrap().is_empty());
    }

    #[test]
    fn test_sync_requires_selected_group_active() {
        let (mut scene, group, a, ..) = grouped();
        scene.select_only(&[a]).unwrap();
        assert!(sync_group_selection(&mut scene, false).unwrap().is_empty());

        scene.set_active(group).unwrap();
        // Active but not selected
        assert!(sync_group_selection(&mut scene, false).unwrap().is_empty());
    }
}
