//! Error types shared by the lineage crates

use thiserror::Error;

use crate::id::ObjectId;

/// The core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The parent graph is not a forest
    #[error("Malformed hierarchy: parent cycle through {objects:?}")]
    MalformedHierarchy {
        /// Objects on, or only reachable through, the cycle
        objects: Vec<ObjectId>,
    },

    /// Id does not belong to the scene
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Name lookup failed
    #[error("Unknown object name: {0}")]
    UnknownObject(String),

    /// Two objects share a name
    #[error("Duplicate object name: {0}")]
    DuplicateObject(String),

    /// A scene mutation failed part way through an operation.
    ///
    /// Mutations that were already applied are not rolled back.
    #[error("Scene mutation failed after {applied} change(s): {source}")]
    MutationAborted {
        /// Number of mutations applied before the failure
        applied: usize,
        /// The failing mutation's error
        #[source]
        source: Box<Error>,
    },

    /// Operator invoked without any selected objects
    #[error("No objects selected")]
    NothingSelected,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed input document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap `self` as the failure of a partially applied operation
    pub fn aborted_after(self, applied: usize) -> Self {
        Error::MutationAborted {
            applied,
            source: Box::new(self),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_wraps_source() {
        let err = Error::ObjectNotFound(ObjectId(3)).aborted_after(2);
        assert_eq!(
            err.to_string(),
            "Scene mutation failed after 2 change(s): Object not found: Object(3)"
        );
        match err {
            Error::MutationAborted { applied, source } => {
                assert_eq!(applied, 2);
                assert!(matches!(*source, Error::ObjectNotFound(ObjectId(3))));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_message_lists_objects() {
        let err = Error::MalformedHierarchy {
            objects: vec![ObjectId(1), ObjectId(2)],
        };
        assert!(err.to_string().contains("ObjectId(1)"));
    }
}
