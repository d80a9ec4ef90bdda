//! Shared types for the loft workspace.
//!
//! This crate holds the vocabulary every other loft crate speaks:
//!
//! - [`ExecResult`] — the structured outcome of every shell command
//! - [`FsError`] / [`BridgeError`] / [`CollaboratorError`] — the error
//!   taxonomy of the virtual filesystem and its external collaborators
//! - [`NodeKind`] / [`EntryInfo`] / [`NodeMeta`] — directory listing and
//!   node metadata types

mod entry;
mod error;
mod result;

pub use entry::{EntryInfo, NodeKind, NodeMeta};
pub use error::{BridgeError, CollaboratorError, FsError, FsResult};
pub use result::ExecResult;
