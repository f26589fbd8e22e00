//! Object identifiers

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of a scene object.
///
/// Ids are opaque and only meaningful to the scene that allocated them.
/// Parent/child links between objects are expressed through ids, never
/// through references, so the scene stays the sole owner of every object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Get the raw index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Thread-safe object id allocator
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU32,
}

impl IdGenerator {
    /// Create a new generator starting at zero
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    /// Allocate the next unique id
    pub fn next(&self) -> ObjectId {
        ObjectId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for IdGenerator {
    fn clone(&self) -> Self {
        Self {
            next: AtomicU32::new(self.allocated()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator() {
        let gen = IdGenerator::new();
        let a = gen.next();
        let b = gen.next();
        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(gen.allocated(), 2);
    }

    #[test]
    fn test_cloned_generator_continues() {
        let gen = IdGenerator::new();
        gen.next();
        let copy = gen.clone();
        assert_eq!(copy.next(), ObjectId(1));
        // The original is unaffected by the clone
        assert_eq!(gen.next(), ObjectId(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectId(7).to_string(), "Object(7)");
    }
}
