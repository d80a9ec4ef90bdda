//! Git collaborator contract.
//!
//! Version control is an external collaborator: the core consumes only this
//! read/write contract, never git internals. The `git` builtin is a thin
//! formatter over it, and any rejection surfaces verbatim prefixed `fatal:`
//! — never a crash. The collaborator is optional; the kernel never assumes
//! it is available.

mod repo;

pub use repo::RepoCollaborator;

use async_trait::async_trait;

use loft_types::CollaboratorError;

/// Result alias for collaborator calls.
pub type GitResult<T> = Result<T, CollaboratorError>;

/// How a path differs from the last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
    Conflicted,
}

impl ChangeKind {
    /// Single-letter status code used by the short format.
    pub fn code(self) -> char {
        match self {
            ChangeKind::New => 'A',
            ChangeKind::Modified => 'M',
            ChangeKind::Deleted => 'D',
            ChangeKind::Conflicted => 'U',
        }
    }
}

/// One changed path in the working tree or index.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub path: String,
    pub kind: ChangeKind,
    /// True when the change is staged in the index.
    pub staged: bool,
}

/// One commit in the log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: String,
    pub short_id: String,
    pub message: String,
    pub author: String,
    /// Commit time, seconds since the epoch.
    pub time: i64,
}

/// The external version-control contract the `git` builtin formats.
#[async_trait]
pub trait GitCollaborator: Send + Sync {
    /// True when the workspace is inside a repository.
    async fn is_repo(&self) -> bool;

    async fn status(&self) -> GitResult<Vec<StatusEntry>>;

    /// Stage the given pathspecs.
    async fn add(&self, paths: &[String]) -> GitResult<()>;

    /// Unstage one path.
    async fn reset(&self, path: &str) -> GitResult<()>;

    /// Commit the index; returns the new commit id.
    async fn commit(&self, message: &str) -> GitResult<String>;

    /// The most recent `depth` commits, newest first.
    async fn log(&self, depth: usize) -> GitResult<Vec<LogEntry>>;

    async fn branches(&self) -> GitResult<Vec<String>>;

    async fn current_branch(&self) -> GitResult<Option<String>>;

    async fn create_branch(&self, name: &str) -> GitResult<()>;

    /// Check out a branch or commit-ish ref.
    async fn checkout(&self, target: &str) -> GitResult<()>;

    /// Push the current branch to `origin`.
    async fn push(&self) -> GitResult<()>;

    /// Fetch from `origin` and fast-forward the current branch. Returns a
    /// one-line summary.
    async fn pull(&self) -> GitResult<String>;
}
