//! Directory entry and node metadata types.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Kind of a node in the virtual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    pub fn is_file(self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A directory entry returned by listing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Name of the entry (single path segment, not a full path).
    pub name: String,
    /// Kind of entry.
    pub kind: NodeKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl EntryInfo {
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Non-structural metadata carried by every node.
///
/// None of these fields affect tree shape; `locked` refuses structural
/// mutation of the node until cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_predicates() {
        assert!(NodeKind::Directory.is_dir());
        assert!(!NodeKind::Directory.is_file());
        assert!(NodeKind::File.is_file());
    }

    #[test]
    fn meta_default_is_empty() {
        let meta = NodeMeta::default();
        assert!(meta.tags.is_empty());
        assert!(!meta.favorite && !meta.pinned && !meta.locked);
        assert!(meta.description.is_none());
    }
}
