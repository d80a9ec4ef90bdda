//! clear — Clear the terminal scrollback.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Clear tool: ask the session to empty its scrollback.
pub struct Clear;

#[async_trait]
impl Tool for Clear {
    fn name(&self) -> &str {
        "clear"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("clear", "Clear the terminal scrollback")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ctx.clear_requested = true;
        ExecResult::success("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn clear_sets_the_flag() {
        let ws = Arc::new(Mutex::new(Workspace::new("/")));
        let mut ctx = ExecContext::new(ws, "/");
        assert!(!ctx.clear_requested);

        let result = Clear.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert!(ctx.clear_requested);
    }
}
