//! Virtual file store.
//!
//! Filename → bytes map that stands in for a filesystem. The orchestrator
//! seeds it before the run; opening a seeded name for read copies the bytes
//! into a fresh handle. The store itself is passive: nothing the engine
//! does through a handle ever writes back into it.

use std::collections::BTreeMap;

/// In-memory file store keyed by normalized filename.
///
/// Callers normalize names before touching the store (see
/// [`crate::names::normalize`]); the store matches keys exactly.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl FileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        FileStore {
            files: BTreeMap::new(),
        }
    }

    /// Insert or replace an entry.
    pub fn seed(&mut self, filename: &str, bytes: Vec<u8>) {
        self.files.insert(String::from(filename), bytes);
    }

    /// Bytes staged under `filename`, if any.
    pub fn get(&self, filename: &str) -> Option<&[u8]> {
        self.files.get(filename).map(|v| v.as_slice())
    }

    /// True if `filename` is staged.
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Number of staged files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_then_get_roundtrips() {
        let mut store = FileStore::new();
        store.seed("input.tex", b"\\relax".to_vec());
        assert_eq!(store.get("input.tex"), Some(b"\\relax".as_slice()));
        assert!(store.contains("input.tex"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seeding_twice_replaces() {
        let mut store = FileStore::new();
        store.seed("a", vec![1]);
        store.seed("a", vec![2, 3]);
        assert_eq!(store.get("a"), Some([2, 3].as_slice()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_names_miss() {
        let store = FileStore::new();
        assert_eq!(store.get("missing.tex"), None);
        assert!(!store.contains("missing.tex"));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = FileStore::new();
        store.seed("a", vec![1]);
        store.seed("b", vec![2]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
    }
}
