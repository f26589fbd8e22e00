//! # lineage_select
//!
//! Steps a selection up or down the object hierarchy.
//!
//! ## Features
//!
//! - **Select Up / Down**: move the selection to the parents or children of
//!   what is selected, one generation or all the way
//! - **Boundaries**: report the top or bottom of the hierarchy, telling apart
//!   "nothing left" from "only hidden objects left"
//! - **Unhide / Inclusive / Modifier targets**: optional step flags
//! - **Undo/Redo**: steps run as commands with transaction support
//! - **HUD feedback**: fading labels describing each step
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph → build_layers → SelectHierarchy → walk → TraversalResult → HUD labels
//! ```
//!
//! The scene is re-layered on every step, nothing is cached between calls.

pub mod active;
pub mod command;
pub mod feedback;
pub mod frontier;
pub mod history;
pub mod operator;
pub mod preferences;
pub mod walker;

// Re-export commonly used types
pub use command::{Command, CommandResult, SceneSnapshot, SelectHierarchyCommand};
pub use feedback::{FeedbackState, HudLabel, HudLine, Tone};
pub use frontier::Frontier;
pub use history::{Transaction, UndoHistory};
pub use operator::{Outcome, SelectHierarchy};
pub use preferences::{SelectPreferences, CONFIG_ENV};
pub use walker::{select_down, select_up, walk, BoundaryKind, Direction, TraversalResult, WalkPolicy};

pub use lineage_core::{Error, ObjectId, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "Lineage Select";
