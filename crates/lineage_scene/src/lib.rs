//! # lineage_scene
//!
//! The scene side of hierarchy selection:
//!
//! - [`SceneGraph`]: the interface a host scene exposes
//! - [`Scene`]: an in-memory implementation used by tools and tests
//! - [`build_layers`]: partitions objects into hierarchy generations
//! - [`group`]: group auto-select, the deferred step hosts run after updates
//! - [`serializer`]: TOML scene files

pub mod graph;
pub mod group;
pub mod layers;
pub mod scene;
pub mod serializer;

pub use graph::SceneGraph;
pub use group::{select_group_children, sync_group_selection};
pub use layers::{build_layers, build_scene_layers, HierarchyLayers};
pub use scene::{Modifier, Scene, SceneObject, SceneSettings};

pub use lineage_core::{Error, ObjectId, Result};
