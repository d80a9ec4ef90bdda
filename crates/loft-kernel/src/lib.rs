//! loft-kernel — the core of the loft workspace.
//!
//! The kernel owns three layers:
//!
//! - [`workspace`] — the virtual filesystem: an arena node tree with tab
//!   bookkeeping, optionally write-through to a real directory via the
//!   [`bridge`] contract
//! - [`tools`] — the builtin command table the shell dispatches into
//! - [`shell`] — per-instance interpreter state: working directory,
//!   bounded history, scrollback
//!
//! External collaborators (the disk [`bridge`] and the [`git`] contract)
//! are traits; the kernel never assumes either is available.

pub mod bridge;
pub mod git;
pub mod shell;
pub mod tools;
pub mod workspace;

pub use shell::{ScrollEntry, ShellSession};
pub use workspace::{FileTree, NodeId, Workspace};
