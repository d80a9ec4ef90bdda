//! The arena node tree.
//!
//! Nodes live in a slotmap keyed by [`NodeId`]; parent/child links are ids,
//! never references, so moves and renames cannot create aliasing or cycles.
//! The tree is a forest with a single synthetic root: every non-root node's
//! `parent` resolves to a directory whose `children` lists it, and sibling
//! names are unique.
//!
//! All operations here are pure structure — no disk, no tabs. Errors are
//! values; nothing panics on malformed input.

use slotmap::{new_key_type, SlotMap};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use loft_types::{EntryInfo, FsError, FsResult, NodeKind, NodeMeta};

new_key_type! {
    /// Stable, opaque key for a node. Never reused while the node is live.
    pub struct NodeId;
}

/// One file or directory entry in the virtual tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    content: String,
    pub size: u64,
    pub modified: SystemTime,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub meta: NodeMeta,
}

impl Node {
    fn new(name: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name,
            kind,
            content: String::new(),
            size: 0,
            modified: SystemTime::now(),
            parent,
            children: Vec::new(),
            meta: NodeMeta::default(),
        }
    }

    /// File content. Empty for directories.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// A partial update applied by [`FileTree::update`].
///
/// `None` fields are left unchanged. `description` uses a nested option so
/// a description can be cleared as well as set.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
    pub pinned: Option<bool>,
    pub locked: Option<bool>,
    pub description: Option<Option<String>>,
}

/// The canonical node tree.
#[derive(Debug)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Create an empty tree containing only the synthetic root directory.
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new(String::new(), NodeKind::Directory, None));
        Self { arena, root }
    }

    /// The synthetic root. Always a directory, never removable.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node, or `None` if the id is stale.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Look up a node, failing with `NotFound` on a stale id.
    pub fn node(&self, id: NodeId) -> FsResult<&Node> {
        self.arena
            .get(id)
            .ok_or_else(|| FsError::NotFound("no such node".into()))
    }

    fn node_mut(&mut self, id: NodeId) -> FsResult<&mut Node> {
        self.arena
            .get_mut(id)
            .ok_or_else(|| FsError::NotFound("no such node".into()))
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    // ── Paths ──────────────────────────────────────────────────────────

    /// Absolute path of a node: names joined by `/`, walked via `parent`.
    pub fn path_of(&self, id: NodeId) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(node) = self.arena.get(current) {
            match node.parent {
                Some(parent) => {
                    segments.push(node.name.clone());
                    current = parent;
                }
                None => break,
            }
        }
        let mut path = PathBuf::from("/");
        for seg in segments.iter().rev() {
            path.push(seg);
        }
        path
    }

    /// Resolve an absolute path to a node.
    ///
    /// Handles `.` and `..`; `..` at the root stays at the root. Returns
    /// `None` for anything unresolvable — malformed input never panics.
    pub fn resolve(&self, path: &Path) -> Option<NodeId> {
        let mut current = self.root;
        for component in path.components() {
            match component {
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    // Root is its own parent.
                    current = self.arena.get(current)?.parent.unwrap_or(self.root);
                }
                Component::Normal(seg) => {
                    let name = seg.to_str()?;
                    current = self.child_by_name(current, name)?;
                }
            }
        }
        Some(current)
    }

    /// Find a direct child by name.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let node = self.arena.get(parent)?;
        node.children
            .iter()
            .copied()
            .find(|&c| self.arena.get(c).map(|n| n.name.as_str()) == Some(name))
    }

    /// True if `ancestor` lies on `descendant`'s parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, mut descendant: NodeId) -> bool {
        while let Some(node) = self.arena.get(descendant) {
            match node.parent {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => descendant = parent,
                None => break,
            }
        }
        false
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// Create a node attached to `parent`.
    ///
    /// Fails `AlreadyExists` on a sibling-name collision and
    /// `NotADirectory` when the parent is a file. Success appends to the
    /// parent's children and refreshes its modified time.
    pub fn create(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> FsResult<NodeId> {
        self.validate_create(parent, name)?;
        let id = self.arena.insert(Node::new(name.to_string(), kind, Some(parent)));
        let now = SystemTime::now();
        let parent_node = self.node_mut(parent)?;
        parent_node.children.push(id);
        parent_node.modified = now;
        Ok(id)
    }

    /// Check the guards `create` enforces without mutating anything.
    pub fn validate_create(&self, parent: NodeId, name: &str) -> FsResult<()> {
        let parent_node = self.node(parent)?;
        if !parent_node.is_dir() {
            return Err(FsError::NotADirectory(self.path_of(parent).display().to_string()));
        }
        if name.is_empty() || name.contains('/') {
            return Err(FsError::NotFound(format!("invalid name: {:?}", name)));
        }
        if self.child_by_name(parent, name).is_some() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /// Remove a node and every descendant, returning all removed ids so the
    /// caller can invalidate tabs.
    ///
    /// A non-empty directory without `recursive` fails `NotEmpty`.
    pub fn delete(&mut self, id: NodeId, recursive: bool) -> FsResult<Vec<NodeId>> {
        self.validate_delete(id, recursive)?;
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent) {
                parent_node.children.retain(|&c| c != id);
                parent_node.modified = SystemTime::now();
            }
        }
        let removed = self.subtree_ids(id);
        for &rid in &removed {
            self.arena.remove(rid);
        }
        Ok(removed)
    }

    /// Check the guards `delete` enforces without mutating anything.
    pub fn validate_delete(&self, id: NodeId, recursive: bool) -> FsResult<()> {
        let node = self.node(id)?;
        if node.parent.is_none() {
            return Err(FsError::Locked("/".into()));
        }
        if node.meta.locked {
            return Err(FsError::Locked(self.path_of(id).display().to_string()));
        }
        if node.is_dir() && !node.children.is_empty() && !recursive {
            return Err(FsError::NotEmpty(self.path_of(id).display().to_string()));
        }
        Ok(())
    }

    /// Rename a node in place. The id never changes, so any tab holding it
    /// observes the new name on its next read.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> FsResult<()> {
        self.validate_rename(id, new_name)?;
        let node = self.node_mut(id)?;
        node.name = new_name.to_string();
        node.modified = SystemTime::now();
        Ok(())
    }

    /// Check the guards `rename` enforces without mutating anything.
    pub fn validate_rename(&self, id: NodeId, new_name: &str) -> FsResult<()> {
        let node = self.node(id)?;
        let parent = match node.parent {
            Some(p) => p,
            None => return Err(FsError::Locked("/".into())),
        };
        if node.meta.locked {
            return Err(FsError::Locked(self.path_of(id).display().to_string()));
        }
        if new_name.is_empty() || new_name.contains('/') {
            return Err(FsError::NotFound(format!("invalid name: {:?}", new_name)));
        }
        if node.name == new_name {
            return Ok(());
        }
        if self.child_by_name(parent, new_name).is_some() {
            return Err(FsError::AlreadyExists(new_name.to_string()));
        }
        Ok(())
    }

    /// Detach a node and reattach it under `new_parent`.
    ///
    /// Rejected `InvalidMove` when the destination is the node itself, one
    /// of its descendants, or already has a same-named child. The tree is
    /// untouched after a rejection.
    pub fn relocate(&mut self, id: NodeId, new_parent: NodeId) -> FsResult<()> {
        self.validate_relocate(id, new_parent)?;
        let old_parent = self.node(id)?.parent;
        if old_parent == Some(new_parent) {
            return Ok(());
        }
        let now = SystemTime::now();
        if let Some(old) = old_parent {
            if let Some(old_node) = self.arena.get_mut(old) {
                old_node.children.retain(|&c| c != id);
                old_node.modified = now;
            }
        }
        let new_node = self.node_mut(new_parent)?;
        new_node.children.push(id);
        new_node.modified = now;
        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Check the guards `relocate` enforces without mutating anything.
    pub fn validate_relocate(&self, id: NodeId, new_parent: NodeId) -> FsResult<()> {
        let node = self.node(id)?;
        if node.parent.is_none() {
            return Err(FsError::Locked("/".into()));
        }
        if node.meta.locked {
            return Err(FsError::Locked(self.path_of(id).display().to_string()));
        }
        let path = self.path_of(id).display().to_string();
        if new_parent == id || self.is_ancestor(id, new_parent) {
            return Err(FsError::InvalidMove(path));
        }
        let dest = self.node(new_parent)?;
        if !dest.is_dir() {
            return Err(FsError::NotADirectory(
                self.path_of(new_parent).display().to_string(),
            ));
        }
        if node.parent != Some(new_parent) && self.child_by_name(new_parent, &node.name).is_some() {
            return Err(FsError::InvalidMove(path));
        }
        Ok(())
    }

    /// Replace a file's content, recomputing size and modified time.
    pub fn set_content(&mut self, id: NodeId, content: &str) -> FsResult<()> {
        self.validate_set_content(id)?;
        let node = self.node_mut(id)?;
        node.content = content.to_string();
        node.size = content.len() as u64;
        node.modified = SystemTime::now();
        Ok(())
    }

    /// Check the guards `set_content` enforces without mutating anything.
    pub fn validate_set_content(&self, id: NodeId) -> FsResult<()> {
        let node = self.node(id)?;
        if node.is_dir() {
            return Err(FsError::IsADirectory(self.path_of(id).display().to_string()));
        }
        if node.meta.locked {
            return Err(FsError::Locked(self.path_of(id).display().to_string()));
        }
        Ok(())
    }

    /// Refresh a node's modified time without touching content.
    pub fn touch(&mut self, id: NodeId) -> FsResult<()> {
        self.node_mut(id)?.modified = SystemTime::now();
        Ok(())
    }

    /// Apply a partial metadata update. Renames go through the rename guard;
    /// toggling `locked` is always allowed (that is how nodes unlock).
    pub fn update(&mut self, id: NodeId, patch: NodePatch) -> FsResult<()> {
        if let Some(ref name) = patch.name {
            self.rename(id, name)?;
        }
        let node = self.node_mut(id)?;
        if let Some(tags) = patch.tags {
            node.meta.tags = tags;
        }
        if let Some(favorite) = patch.favorite {
            node.meta.favorite = favorite;
        }
        if let Some(pinned) = patch.pinned {
            node.meta.pinned = pinned;
        }
        if let Some(locked) = patch.locked {
            node.meta.locked = locked;
        }
        if let Some(description) = patch.description {
            node.meta.description = description;
        }
        node.modified = SystemTime::now();
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Ordered children of a directory. Empty for files and stale ids.
    pub fn list_children(&self, id: NodeId) -> Vec<EntryInfo> {
        let node = match self.arena.get(id) {
            Some(n) if n.is_dir() => n,
            _ => return Vec::new(),
        };
        node.children
            .iter()
            .filter_map(|&c| self.arena.get(c))
            .map(|child| EntryInfo {
                name: child.name.clone(),
                kind: child.kind,
                size: child.size,
                modified: child.modified,
            })
            .collect()
    }

    /// The node and all its descendants, parents before children.
    pub fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.get(current) {
                result.push(current);
                stack.extend(node.children.iter().copied());
            }
        }
        result
    }

    /// Unguarded subtree removal for resync, where disk is truth and the
    /// locked/non-empty guards do not apply. Returns the removed ids.
    pub(crate) fn purge(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root || self.arena.get(id).is_none() {
            return Vec::new();
        }
        if let Some(parent) = self.arena.get(id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.arena.get_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        let removed = self.subtree_ids(id);
        for &rid in &removed {
            self.arena.remove(rid);
        }
        removed
    }

    /// Unguarded content/timestamp overwrite for resync.
    pub(crate) fn sync_file(&mut self, id: NodeId, content: &str, modified: Option<SystemTime>) {
        if let Some(node) = self.arena.get_mut(id) {
            if node.kind.is_file() {
                node.content = content.to_string();
                node.size = content.len() as u64;
            }
            if let Some(modified) = modified {
                node.modified = modified;
            }
        }
    }

    /// Total content size of a subtree in bytes.
    pub fn subtree_size(&self, id: NodeId) -> u64 {
        self.subtree_ids(id)
            .iter()
            .filter_map(|&n| self.arena.get(n))
            .map(|n| n.size)
            .sum()
    }

    /// Verify the forest invariants. Test support; returns the first
    /// violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (id, node) in self.arena.iter() {
            match node.parent {
                None => {
                    if id != self.root {
                        return Err(format!("orphan node {:?} ({})", id, node.name));
                    }
                }
                Some(parent) => {
                    let parent_node = self
                        .arena
                        .get(parent)
                        .ok_or_else(|| format!("dangling parent of {}", node.name))?;
                    if !parent_node.is_dir() {
                        return Err(format!("parent of {} is not a directory", node.name));
                    }
                    if !parent_node.children.contains(&id) {
                        return Err(format!("{} missing from parent children", node.name));
                    }
                    if self.is_ancestor(id, id) {
                        return Err(format!("cycle through {}", node.name));
                    }
                }
            }
            let mut names: Vec<&str> = node
                .children
                .iter()
                .filter_map(|&c| self.arena.get(c))
                .map(|n| n.name.as_str())
                .collect();
            let child_count = names.len();
            if child_count != node.children.len() {
                return Err(format!("{} has dangling children", node.name));
            }
            names.sort_unstable();
            names.dedup();
            if names.len() != child_count {
                return Err(format!("duplicate sibling names under {}", node.name));
            }
            if node.kind.is_file() {
                if !node.children.is_empty() {
                    return Err(format!("file {} has children", node.name));
                }
                if node.size != node.content.len() as u64 {
                    return Err(format!("size mismatch on {}", node.name));
                }
            }
        }
        Ok(())
    }
}
