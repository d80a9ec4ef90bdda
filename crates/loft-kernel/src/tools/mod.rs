//! Tool system for loft.
//!
//! Every shell command is a tool: a unit struct implementing [`Tool`],
//! registered in the [`ToolRegistry`] the interpreter dispatches into.
//! Handlers only see [`ToolArgs`] and [`ExecContext`] — all tree access
//! goes through the workspace, never through cached structure.

pub mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::{ExecContext, LateWriter};
pub use registry::ToolRegistry;
pub use traits::{ParamSchema, Tool, ToolArgs, ToolSchema};
