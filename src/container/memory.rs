//! In-memory container used by tests, benchmarks and fuzzing.

use std::collections::{BTreeMap, BTreeSet};

use super::{Container, ContainerError, EntryKind};

/// A [`Container`] backed by a map of stream paths to bytes.
///
/// Parent storages are registered implicitly when a stream is inserted, so
/// `"ImageInfo"` is a storage as soon as `"ImageInfo/Voltage"` exists.
///
/// # Example
///
/// ```
/// use txrm_params::container::{Container, EntryKind, MemoryContainer};
///
/// let container = MemoryContainer::new()
///     .with_stream("ImageInfo/Voltage", 90.0f32.to_le_bytes());
/// assert_eq!(container.entry_kind("ImageInfo"), EntryKind::Storage);
/// assert_eq!(container.entry_kind("ImageInfo/Voltage"), EntryKind::Stream);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    streams: BTreeMap<String, Vec<u8>>,
    storages: BTreeSet<String>,
}

impl MemoryContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a stream.
    pub fn insert_stream(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        let path = normalize(path);
        self.register_parents(&path);
        self.storages.remove(&path);
        self.streams.insert(path, data.into());
    }

    /// Insert an empty storage.
    pub fn insert_storage(&mut self, path: &str) {
        let path = normalize(path);
        self.register_parents(&path);
        self.streams.remove(&path);
        self.storages.insert(path);
    }

    /// Remove a stream or storage. Children of a removed storage are kept.
    pub fn remove(&mut self, path: &str) {
        let path = normalize(path);
        self.streams.remove(&path);
        self.storages.remove(&path);
    }

    /// Builder form of [`insert_stream`](Self::insert_stream).
    pub fn with_stream(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert_stream(path, data);
        self
    }

    /// Builder form of [`insert_storage`](Self::insert_storage).
    pub fn with_storage(mut self, path: &str) -> Self {
        self.insert_storage(path);
        self
    }

    /// Builder form of [`remove`](Self::remove).
    pub fn without(mut self, path: &str) -> Self {
        self.remove(path);
        self
    }

    fn register_parents(&mut self, path: &str) {
        let mut prefix = String::new();
        let parts: Vec<&str> = path.split('/').collect();
        for part in &parts[..parts.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.storages.insert(prefix.clone());
        }
    }
}

impl Container for MemoryContainer {
    fn entry_kind(&self, path: &str) -> EntryKind {
        let path = normalize(path);
        if self.streams.contains_key(&path) {
            EntryKind::Stream
        } else if self.storages.contains(&path) {
            EntryKind::Storage
        } else {
            EntryKind::Absent
        }
    }

    fn read_stream(&mut self, path: &str) -> Result<Vec<u8>, ContainerError> {
        self.streams
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| ContainerError::NoSuchStream(path.to_string()))
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_are_storages() {
        let container = MemoryContainer::new().with_stream("A/B/C/Leaf", vec![1, 2, 3]);

        assert_eq!(container.entry_kind("A"), EntryKind::Storage);
        assert_eq!(container.entry_kind("A/B/C"), EntryKind::Storage);
        assert_eq!(container.entry_kind("/A/B/C/Leaf"), EntryKind::Stream);
        assert_eq!(container.entry_kind("A/Leaf"), EntryKind::Absent);
    }

    #[test]
    fn test_storage_replaces_stream() {
        let mut container = MemoryContainer::new()
            .with_stream("ImageInfo/Voltage", vec![0; 4])
            .with_storage("ImageInfo/Voltage");

        assert_eq!(container.entry_kind("ImageInfo/Voltage"), EntryKind::Storage);
        assert!(container.read_stream("ImageInfo/Voltage").is_err());
    }

    #[test]
    fn test_remove() {
        let container = MemoryContainer::new()
            .with_stream("ImageInfo/Voltage", vec![0; 4])
            .without("ImageInfo/Voltage");

        assert!(!container.exists("ImageInfo/Voltage"));
        assert!(container.exists("ImageInfo"));
    }
}
