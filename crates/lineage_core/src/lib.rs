//! # lineage_core - Lineage Core
//!
//! Primitives shared by every lineage crate:
//! - **Ids**: copyable object identities handed out by a scene
//! - **Errors**: one error enum for hierarchy, scene and configuration failures

pub mod error;
pub mod id;

pub use error::{Error, Result};
pub use id::{IdGenerator, ObjectId};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::id::{IdGenerator, ObjectId};
}
