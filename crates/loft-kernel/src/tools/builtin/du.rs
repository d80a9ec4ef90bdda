//! du — Disk usage of a subtree.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Du tool: total content bytes of a path's subtree.
pub struct Du;

#[async_trait]
impl Tool for Du {
    fn name(&self) -> &str {
        "du"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("du", "Report subtree size in bytes")
            .param(ParamSchema::optional("path", "string", "Path to measure"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = args.get_string("path", 0).unwrap_or_else(|| ".".to_string());

        let ws = ctx.ws.lock().await;
        let id = match ws.resolve_path(&path, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("du: {}: not found", path)),
        };
        let total = ws.tree().subtree_size(id);
        ExecResult::success(format!("{}\t{}", total, path))
    }
}
