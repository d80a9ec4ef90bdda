//! Error taxonomy for the virtual filesystem and its collaborators.
//!
//! Every error here is a value that crosses the VFS boundary — command
//! handlers render them as plain text and set the error flag. Nothing in
//! this taxonomy is fatal to the process.

use thiserror::Error;

/// Result alias for VFS operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors produced by virtual filesystem operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// The path or node does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A sibling with the same name already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Directory removal without the recursive flag.
    #[error("directory not empty: {0}")]
    NotEmpty(String),

    /// A directory operation was attempted on a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A file operation was attempted on a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Move into self, into a descendant, or onto a same-named sibling.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// The node's metadata marks it locked against structural mutation.
    #[error("locked: {0}")]
    Locked(String),

    /// A disk bridge call failed; the in-memory tree was left untouched.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Errors surfaced by the disk bridge.
///
/// The bridge is an optional capability; the core assumes every call can
/// fail and recovers locally at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// No bridge is bound, or the bridge rejected the connection.
    #[error("disk bridge unavailable")]
    Unavailable,

    /// The bridge did not answer within the operation deadline.
    #[error("disk bridge timed out")]
    Timeout,

    /// The bridge answered with an error message.
    #[error("{0}")]
    Failure(String),
}

impl BridgeError {
    /// Wrap an arbitrary error message as a bridge failure.
    pub fn failure(msg: impl Into<String>) -> Self {
        BridgeError::Failure(msg.into())
    }
}

/// A rejection from the git collaborator.
///
/// The `git` builtin renders these verbatim, prefixed `fatal:`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(msg: impl Into<String>) -> Self {
        CollaboratorError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_messages() {
        assert_eq!(
            FsError::NotFound("/a/b.txt".into()).to_string(),
            "not found: /a/b.txt"
        );
        assert_eq!(
            FsError::NotEmpty("/a".into()).to_string(),
            "directory not empty: /a"
        );
        assert_eq!(
            FsError::InvalidMove("/x".into()).to_string(),
            "invalid move: /x"
        );
    }

    #[test]
    fn bridge_error_passes_through_fs_error() {
        let err: FsError = BridgeError::failure("disk full").into();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn collaborator_error_is_verbatim() {
        let err = CollaboratorError::new("not a git repository");
        assert_eq!(err.to_string(), "not a git repository");
    }
}
