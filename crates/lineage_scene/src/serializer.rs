//! Scene serialization to/from TOML format.
//!
//! ```toml
//! [scene]
//! name = "Workshop"
//! group_select = true
//!
//! [[objects]]
//! name = "Table"
//! group = true
//!
//! [[objects]]
//! name = "Leg"
//! parent = "Table"
//! hidden = true
//!
//! [[objects.modifiers]]
//! name = "Mirror"
//! target = "Table"
//! ```

use std::path::Path;

use lineage_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::graph::SceneGraph;
use crate::scene::{Modifier, Scene};

/// Scene file data structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneData {
    pub scene: SceneMetadata,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
}

/// Scene metadata and group policies.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default)]
    pub group_select: bool,
    #[serde(default)]
    pub group_recursive_select: bool,
}

/// Object data for serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_true")]
    pub in_view_layer: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub group: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierData>,
}

/// Modifier data for serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModifierData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default = "default_true")]
    pub show_viewport: bool,
}

fn default_true() -> bool {
    true
}

impl SceneData {
    /// Build a live scene.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, unknown parent/target names and parent
    /// cycles.
    pub fn into_scene(self) -> Result<Scene> {
        let mut scene = Scene::new(self.scene.name);
        scene.settings.group_select = self.scene.group_select;
        scene.settings.group_recursive_select = self.scene.group_recursive_select;

        for object in &self.objects {
            scene.spawn(object.name.clone())?;
        }

        let mut active = None;
        for object in &self.objects {
            let id = scene.lookup(&object.name)?;

            if let Some(parent) = &object.parent {
                let parent = scene.lookup(parent)?;
                scene.set_parent(id, Some(parent))?;
            }

            scene.set_hidden(id, object.hidden)?;
            scene.set_in_view_layer(id, object.in_view_layer)?;
            scene.set_group(id, object.group)?;
            scene.set_selected(id, object.selected)?;

            for modifier in &object.modifiers {
                let target = match &modifier.target {
                    Some(name) => Some(scene.lookup(name)?),
                    None => None,
                };
                scene.add_modifier(
                    id,
                    Modifier {
                        name: modifier.name.clone(),
                        target,
                        show_viewport: modifier.show_viewport,
                    },
                )?;
            }

            if object.active {
                if active.is_some() {
                    log::warn!("Multiple active objects in scene file, keeping the first");
                } else {
                    active = Some(id);
                }
            }
        }

        if let Some(id) = active {
            scene.set_active(id)?;
        }

        Ok(scene)
    }

    /// Capture a live scene.
    pub fn from_scene(scene: &Scene) -> Self {
        let name_of = |id| scene.name_of(id).map(str::to_string);

        let objects = scene
            .objects()
            .map(|object| ObjectData {
                name: object.name.clone(),
                parent: object.parent.and_then(name_of),
                hidden: object.hidden,
                in_view_layer: object.in_view_layer,
                selected: object.selected,
                active: scene.active() == Some(object.id),
                group: object.group,
                modifiers: object
                    .modifiers
                    .iter()
                    .map(|m| ModifierData {
                        name: m.name.clone(),
                        target: m.target.and_then(name_of),
                        show_viewport: m.show_viewport,
                    })
                    .collect(),
            })
            .collect();

        Self {
            scene: SceneMetadata {
                name: scene.name().to_string(),
                group_select: scene.settings.group_select,
                group_recursive_select: scene.settings.group_recursive_select,
            },
            objects,
        }
    }
}

/// Parse a scene from TOML text.
pub fn load_str(source: &str) -> Result<Scene> {
    let data: SceneData = toml::from_str(source).map_err(|e| Error::Parse(e.to_string()))?;
    data.into_scene()
}

/// Load a scene from a TOML file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let scene = load_str(&source)?;
    log::info!("Loaded scene '{}' ({} objects) from {:?}", scene.name(), scene.len(), path);
    Ok(scene)
}

/// Serialize a scene to TOML text.
pub fn to_toml_string(scene: &Scene) -> Result<String> {
    toml::to_string_pretty(&SceneData::from_scene(scene)).map_err(|e| Error::Parse(e.to_string()))
}

/// Write a scene to a TOML file.
pub fn save_file(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_toml_string(scene)?)?;
    log::info!("Saved scene '{}' to {:?}", scene.name(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSHOP: &str = r#"
[scene]
name = "Workshop"
group_select = true

[[objects]]
name = "Table"
group = true
selected = true
active = true

[[objects]]
name = "Leg"
parent = "Table"
hidden = true

[[objects]]
name = "Lamp"
in_view_layer = false

[[objects.modifiers]]
name = "Mirror"
target = "Table"

[[objects.modifiers]]
name = "Array"
show_viewport = false
"#;

    #[test]
    fn test_load_scene() {
        let scene = load_str(WORKSHOP).unwrap();
        let table = scene.find("Table").unwrap();
        let leg = scene.find("Leg").unwrap();
        let lamp = scene.find("Lamp").unwrap();

        assert_eq!(scene.name(), "Workshop");
        assert!(scene.group_auto_select_enabled());
        assert!(scene.is_group_marker(table));
        assert_eq!(scene.parent(leg), Some(table));
        assert!(!scene.is_visible(leg));
        assert_eq!(scene.working_universe(), vec![table, leg]);
        assert_eq!(scene.active(), Some(table));
        assert_eq!(scene.selected(), vec![table]);
        assert_eq!(scene.modifier_targets(lamp), vec![table]);
        assert_eq!(scene.object(lamp).unwrap().modifiers.len(), 2);
    }

    #[test]
    fn test_unknown_parent() {
        let source = r#"
[scene]
name = "Broken"

[[objects]]
name = "Orphan"
parent = "Nobody"
"#;
        assert!(matches!(load_str(source), Err(Error::UnknownObject(name)) if name == "Nobody"));
    }

    #[test]
    fn test_parent_cycle_rejected() {
        let source = r#"
[scene]
name = "Loop"

[[objects]]
name = "A"
parent = "B"

[[objects]]
name = "B"
parent = "A"
"#;
        assert!(matches!(load_str(source), Err(Error::MalformedHierarchy { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(load_str("[scene"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_toml_output_reloads() {
        let scene = load_str(WORKSHOP).unwrap();
        let text = to_toml_string(&scene).unwrap();
        let reloaded = load_str(&text).unwrap();

        let leg = reloaded.find("Leg").unwrap();
        assert_eq!(reloaded.name_of(reloaded.parent(leg).unwrap()), Some("Table"));
        assert_eq!(reloaded.active(), reloaded.find("Table"));
        assert_eq!(reloaded.len(), scene.len());
    }
}
