//! The workspace — canonical node tree, tab bookkeeping, and the
//! write-through disk binding.
//!
//! With no bridge bound, mutations apply directly in memory (pure
//! simulation mode). With a bridge bound, every mutating operation follows
//! the dual-backend rule: call the equivalent bridge operation first; on
//! success mirror the mutation and re-derive the tree from a full recursive
//! re-enumeration of the bound root; on failure leave the in-memory tree
//! untouched and surface the bridge's error.
//!
//! The re-derivation is an id-preserving reconcile: nodes whose path and
//! kind survive on disk keep their [`NodeId`], so open tabs stay valid
//! across disk-backed mutations. Memory can never silently diverge from
//! disk truth — anything the enumeration does not report is dropped, and
//! anything it reports is present afterwards.
//!
//! Callers share a workspace behind `Arc<tokio::sync::Mutex<_>>`; holding
//! the lock across the bridge call plus resync is what serializes mutations
//! from concurrent shell instances.

mod tabs;
mod tree;

pub use tabs::TabStrip;
pub use tree::{FileTree, Node, NodeId, NodePatch};

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use loft_types::{BridgeError, EntryInfo, FsError, FsResult, NodeKind};

use crate::bridge::DiskBridge;

/// Deadline for any single bridge call.
const BRIDGE_TIMEOUT: Duration = Duration::from_secs(10);

/// The virtual filesystem plus session state every other component consumes.
pub struct Workspace {
    tree: FileTree,
    tabs: TabStrip,
    home: PathBuf,
    bridge: Option<Arc<dyn DiskBridge>>,
}

impl Workspace {
    /// Create a pure in-memory workspace. The home directory chain is
    /// created so `cd` with no argument always has a destination.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let mut ws = Self {
            tree: FileTree::new(),
            tabs: TabStrip::new(),
            home: home.into(),
            bridge: None,
        };
        let home = ws.home.clone();
        let mut current = ws.tree.root();
        for component in home.components() {
            if let std::path::Component::Normal(seg) = component {
                let name = seg.to_string_lossy().into_owned();
                current = match ws.tree.child_by_name(current, &name) {
                    Some(id) => id,
                    // Seeding the home chain on a fresh tree cannot collide.
                    None => ws
                        .tree
                        .create(current, &name, NodeKind::Directory)
                        .unwrap_or(current),
                };
            }
        }
        ws
    }

    /// Bind a disk bridge and load the tree from its enumeration.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn bind(&mut self, bridge: Arc<dyn DiskBridge>) -> FsResult<()> {
        self.resync_with(&bridge).await?;
        self.bridge = Some(bridge);
        Ok(())
    }

    /// True when a disk bridge is bound.
    pub fn is_bound(&self) -> bool {
        self.bridge.is_some()
    }

    /// The configured home directory path (`~`).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Read-only access to the node tree.
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    // ── Path resolution ────────────────────────────────────────────────

    /// Resolve a user-supplied path against a current directory.
    ///
    /// Absolute paths walk from the root; `~` maps to the configured home;
    /// anything else resolves relative to `cwd`. `.` and `..` are handled
    /// by the walk (the root is its own parent). Never panics on malformed
    /// input — unresolvable paths yield `None`.
    pub fn resolve_path(&self, input: &str, cwd: &Path) -> Option<NodeId> {
        self.tree.resolve(&self.absolutize(input, cwd))
    }

    /// Turn a user path into a workspace-absolute path without touching the
    /// tree. Used for destinations that do not exist yet.
    pub fn absolutize(&self, input: &str, cwd: &Path) -> PathBuf {
        if input == "~" {
            self.home.clone()
        } else if let Some(rest) = input.strip_prefix("~/") {
            self.home.join(rest)
        } else if input.starts_with('/') {
            PathBuf::from(input)
        } else {
            cwd.join(input)
        }
    }

    // ── Mutations (write-through when bound) ───────────────────────────

    /// Create a node under `parent`.
    pub async fn create(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> FsResult<NodeId> {
        match self.bridge.clone() {
            None => self.tree.create(parent, name, kind),
            Some(bridge) => {
                self.tree.validate_create(parent, name)?;
                let parent_path = self.tree.path_of(parent);
                match kind {
                    NodeKind::File => {
                        with_timeout(bridge.create_file(&parent_path, name, "")).await?
                    }
                    NodeKind::Directory => {
                        with_timeout(bridge.create_dir(&parent_path, name)).await?
                    }
                }
                let id = self.tree.create(parent, name, kind)?;
                self.resync_with(&bridge).await?;
                Ok(id)
            }
        }
    }

    /// Delete a node (recursively with `recursive`), cascading to tabs.
    pub async fn delete(&mut self, id: NodeId, recursive: bool) -> FsResult<()> {
        match self.bridge.clone() {
            None => {
                let removed = self.tree.delete(id, recursive)?;
                self.tabs.remove_all(&removed);
                Ok(())
            }
            Some(bridge) => {
                self.tree.validate_delete(id, recursive)?;
                let path = self.tree.path_of(id);
                with_timeout(bridge.remove(&path)).await?;
                let removed = self.tree.delete(id, recursive)?;
                self.tabs.remove_all(&removed);
                self.resync_with(&bridge).await
            }
        }
    }

    /// Rename a node in place. The id is stable; tabs observe the new name
    /// by re-reading through it.
    pub async fn rename(&mut self, id: NodeId, new_name: &str) -> FsResult<()> {
        match self.bridge.clone() {
            None => self.tree.rename(id, new_name),
            Some(bridge) => {
                self.tree.validate_rename(id, new_name)?;
                let old_path = self.tree.path_of(id);
                if self.tree.node(id)?.name == new_name {
                    return Ok(());
                }
                let new_path = old_path
                    .parent()
                    .map(|p| p.join(new_name))
                    .unwrap_or_else(|| PathBuf::from(new_name));
                with_timeout(bridge.rename(&old_path, &new_path)).await?;
                self.tree.rename(id, new_name)?;
                self.resync_with(&bridge).await
            }
        }
    }

    /// Detach a node and reattach it under `new_parent`.
    pub async fn relocate(&mut self, id: NodeId, new_parent: NodeId) -> FsResult<()> {
        match self.bridge.clone() {
            None => self.tree.relocate(id, new_parent),
            Some(bridge) => {
                self.tree.validate_relocate(id, new_parent)?;
                let old_path = self.tree.path_of(id);
                let name = self.tree.node(id)?.name.clone();
                let new_path = self.tree.path_of(new_parent).join(&name);
                if old_path == new_path {
                    return Ok(());
                }
                with_timeout(bridge.relocate(&old_path, &new_path)).await?;
                self.tree.relocate(id, new_parent)?;
                self.resync_with(&bridge).await
            }
        }
    }

    /// Replace a file's content; the active tab's view observes the change
    /// without a separate refresh call because it reads through the id.
    pub async fn set_content(&mut self, id: NodeId, content: &str) -> FsResult<()> {
        match self.bridge.clone() {
            None => self.tree.set_content(id, content),
            Some(bridge) => {
                self.tree.validate_set_content(id)?;
                let path = self.tree.path_of(id);
                with_timeout(bridge.write_file(&path, content)).await?;
                self.tree.set_content(id, content)?;
                self.resync_with(&bridge).await
            }
        }
    }

    /// Refresh a node's modified time (the `touch` semantics for an
    /// existing node). For a bound file the content is rewritten so the
    /// disk timestamp moves too.
    pub async fn touch(&mut self, id: NodeId) -> FsResult<()> {
        match self.bridge.clone() {
            None => self.tree.touch(id),
            Some(bridge) => {
                let node = self.tree.node(id)?;
                if node.kind.is_file() {
                    let path = self.tree.path_of(id);
                    let content = node.content().to_string();
                    with_timeout(bridge.write_file(&path, &content)).await?;
                }
                self.tree.touch(id)?;
                self.resync_with(&bridge).await
            }
        }
    }

    /// Apply a partial update. A name change routes through the rename
    /// path (and thus the bridge); metadata is memory-only.
    pub async fn update(&mut self, id: NodeId, patch: NodePatch) -> FsResult<()> {
        let NodePatch { name, ..} = patch.clone();
        if let Some(name) = name {
            self.rename(id, &name).await?;
        }
        self.tree.update(
            id,
            NodePatch {
                name: None,
                ..patch
            },
        )
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Ordered children of a directory, by id or path. Empty for files and
    /// anything unresolvable.
    pub fn list_children(&self, id: NodeId) -> Vec<EntryInfo> {
        self.tree.list_children(id)
    }

    pub fn list_children_at(&self, path: &str, cwd: &Path) -> Vec<EntryInfo> {
        self.resolve_path(path, cwd)
            .map(|id| self.tree.list_children(id))
            .unwrap_or_default()
    }

    // ── Tabs ───────────────────────────────────────────────────────────

    /// Open a node in the tab strip (activates if already open).
    pub fn open_tab(&mut self, id: NodeId) -> FsResult<()> {
        self.tree.node(id)?;
        self.tabs.open(id);
        Ok(())
    }

    pub fn close_tab(&mut self, id: NodeId) {
        self.tabs.close(id);
    }

    pub fn close_all_tabs(&mut self) {
        self.tabs.close_all();
    }

    pub fn active_tab(&self) -> Option<NodeId> {
        self.tabs.active()
    }

    pub fn open_tabs(&self) -> &[NodeId] {
        self.tabs.open_tabs()
    }

    /// Tab labels for rendering, re-read through ids so renames are always
    /// current. Stale ids are skipped.
    pub fn tab_labels(&self) -> Vec<(NodeId, String)> {
        self.tabs
            .open_tabs()
            .iter()
            .filter_map(|&id| self.tree.get(id).map(|n| (id, n.name.clone())))
            .collect()
    }

    // ── Resync ─────────────────────────────────────────────────────────

    /// Re-derive the in-memory tree from a full enumeration of the bound
    /// root, preserving ids for nodes whose path and kind survive.
    #[tracing::instrument(level = "debug", skip_all)]
    async fn resync_with(&mut self, bridge: &Arc<dyn DiskBridge>) -> FsResult<()> {
        let mut entries = with_timeout(bridge.list_tree()).await?;
        entries.sort_by_key(|e| e.path.components().count());
        let on_disk: HashMap<PathBuf, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.path.clone(), i))
            .collect();

        // Drop everything the enumeration no longer reports (or whose kind
        // changed underneath us).
        let mut stale = Vec::new();
        for id in self.tree.subtree_ids(self.tree.root()) {
            if id == self.tree.root() {
                continue;
            }
            let abs = self.tree.path_of(id);
            let rel = abs.strip_prefix("/").unwrap_or(&abs).to_path_buf();
            let keep = match (on_disk.get(&rel), self.tree.get(id)) {
                (Some(&i), Some(node)) => entries[i].kind == node.kind,
                _ => false,
            };
            if !keep {
                stale.push(id);
            }
        }
        for id in stale {
            let removed = self.tree.purge(id);
            self.tabs.remove_all(&removed);
        }

        // Add or refresh everything the enumeration reports, parents first.
        for entry in &entries {
            let abs = Path::new("/").join(&entry.path);
            match self.tree.resolve(&abs) {
                Some(id) => {
                    if entry.kind.is_file() {
                        self.tree.sync_file(id, &entry.content, entry.modified);
                    }
                }
                None => {
                    let parent_abs = abs.parent().unwrap_or_else(|| Path::new("/"));
                    let name = match abs.file_name().and_then(|n| n.to_str()) {
                        Some(n) => n,
                        None => continue,
                    };
                    let parent = match self.tree.resolve(parent_abs) {
                        Some(p) => p,
                        None => continue,
                    };
                    let id = self.tree.create(parent, name, entry.kind)?;
                    if entry.kind.is_file() {
                        self.tree.sync_file(id, &entry.content, entry.modified);
                    }
                }
            }
        }

        Ok(())
    }
}

async fn with_timeout<T>(
    fut: impl Future<Output = Result<T, BridgeError>>,
) -> FsResult<T> {
    match tokio::time::timeout(BRIDGE_TIMEOUT, fut).await {
        Ok(result) => result.map_err(FsError::Bridge),
        Err(_) => Err(FsError::Bridge(BridgeError::Timeout)),
    }
}
