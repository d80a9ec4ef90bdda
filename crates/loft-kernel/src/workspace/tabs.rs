//! Tab/session bookkeeping.
//!
//! Tabs store [`NodeId`]s only — never names or paths — so renames are
//! observed by re-reading through the tree and a move never leaves a tab
//! holding a stale pointer.

use super::tree::NodeId;

/// The ordered set of nodes open for editing plus the active selection.
#[derive(Debug, Default, Clone)]
pub struct TabStrip {
    open: Vec<NodeId>,
    active: Option<NodeId>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a node: activates it if already open, else appends and activates.
    pub fn open(&mut self, id: NodeId) {
        if !self.open.contains(&id) {
            self.open.push(id);
        }
        self.active = Some(id);
    }

    /// Close one tab. If it was active, the deterministic neighbor becomes
    /// active: the tab now at the same index in the shrunk list, the previous
    /// one if the closed tab was last, or nothing if the list emptied.
    pub fn close(&mut self, id: NodeId) {
        let Some(index) = self.open.iter().position(|&t| t == id) else {
            return;
        };
        self.open.remove(index);
        if self.active == Some(id) {
            self.active = self.neighbor_at(index);
        }
    }

    /// Remove every tab referencing one of `ids` (delete cascade). Active
    /// promotion follows the same neighbor rule as `close`.
    pub fn remove_all(&mut self, ids: &[NodeId]) {
        let active_index = self
            .active
            .and_then(|a| self.open.iter().position(|&t| t == a));
        let active_removed = self.active.is_some_and(|a| ids.contains(&a));
        self.open.retain(|t| !ids.contains(t));
        if active_removed {
            self.active = active_index.and_then(|i| self.neighbor_at(i));
        }
    }

    /// Close every tab and clear the active pointer.
    pub fn close_all(&mut self) {
        self.open.clear();
        self.active = None;
    }

    fn neighbor_at(&self, index: usize) -> Option<NodeId> {
        if self.open.is_empty() {
            None
        } else if index < self.open.len() {
            Some(self.open[index])
        } else {
            Some(self.open[self.open.len() - 1])
        }
    }

    /// The open tabs, in order.
    pub fn open_tabs(&self) -> &[NodeId] {
        &self.open
    }

    /// The active node, if any.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
