//! rmdir — Remove empty directories.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Rmdir tool: remove an empty directory.
pub struct Rmdir;

#[async_trait]
impl Tool for Rmdir {
    fn name(&self) -> &str {
        "rmdir"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("rmdir", "Remove an empty directory")
            .param(ParamSchema::required("path", "string", "Directory to remove"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.get_string("path", 0) {
            Some(p) => p,
            None => return ExecResult::failure(1, "rmdir: missing path argument"),
        };

        let mut ws = ctx.ws.lock().await;
        let id = match ws.resolve_path(&path, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("rmdir: {}: no such directory", path)),
        };
        match ws.tree().node(id) {
            Ok(node) if !node.is_dir() => {
                return ExecResult::failure(1, format!("rmdir: {}: not a directory", path))
            }
            Err(e) => return ExecResult::failure(1, format!("rmdir: {}: {}", path, e)),
            Ok(_) => {}
        }

        match ws.delete(id, false).await {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("rmdir: {}: {}", path, e)),
        }
    }
}
