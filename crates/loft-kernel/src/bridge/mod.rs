//! Disk bridge — the optional capability mirroring workspace mutations onto
//! a real directory tree.
//!
//! The bridge is consumed purely as an interface and never assumed
//! available: every call returns a [`BridgeError`] the workspace recovers
//! from locally, leaving the in-memory tree untouched.
//!
//! Paths handed to a bridge are workspace-absolute (`/src/main.rs`); each
//! implementation maps them onto its own root.

mod local;

pub use local::LocalBridge;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use loft_types::{BridgeError, NodeKind};

/// One entry in a full recursive enumeration of the bridge root.
#[derive(Debug, Clone)]
pub struct BridgeEntry {
    /// Path relative to the bridge root, e.g. `src/main.rs`.
    pub path: PathBuf,
    pub kind: NodeKind,
    /// File content; empty for directories.
    pub content: String,
    pub modified: Option<SystemTime>,
}

/// The write side of the dual-backend rule.
///
/// The workspace calls the matching operation here first; on success it
/// re-derives the whole in-memory tree from [`DiskBridge::list_tree`], on
/// failure it surfaces the error and changes nothing.
#[async_trait]
pub trait DiskBridge: Send + Sync {
    /// Recursively enumerate everything under the bridge root.
    async fn list_tree(&self) -> Result<Vec<BridgeEntry>, BridgeError>;

    async fn create_file(&self, parent: &Path, name: &str, content: &str)
        -> Result<(), BridgeError>;

    async fn create_dir(&self, parent: &Path, name: &str) -> Result<(), BridgeError>;

    /// Remove a file or directory tree.
    async fn remove(&self, path: &Path) -> Result<(), BridgeError>;

    /// Rename within a parent.
    async fn rename(&self, old: &Path, new: &Path) -> Result<(), BridgeError>;

    /// Move across parents.
    async fn relocate(&self, old: &Path, new: &Path) -> Result<(), BridgeError>;

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), BridgeError>;
}
