//! history — Replay the command history.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// History tool: replay the bounded history ring with 1-based indices.
pub struct History;

#[async_trait]
impl Tool for History {
    fn name(&self) -> &str {
        "history"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("history", "Show command history")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let lines: Vec<String> = ctx
            .history
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:5}  {}", i + 1, line))
            .collect();
        ExecResult::success(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn history_is_one_based() {
        let ws = Arc::new(Mutex::new(Workspace::new("/")));
        let mut ctx = ExecContext::new(ws, "/");
        ctx.history = vec!["ls".into(), "pwd".into()];

        let result = History.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        let lines: Vec<&str> = result.out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("1  ls"));
        assert!(lines[1].trim_start().starts_with("2  pwd"));
    }

    #[tokio::test]
    async fn empty_history_prints_nothing() {
        let ws = Arc::new(Mutex::new(Workspace::new("/")));
        let mut ctx = ExecContext::new(ws, "/");

        let result = History.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.is_empty());
    }
}
