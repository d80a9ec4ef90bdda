//! env — Print environment variables.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Env tool: print the session environment, sorted by key.
pub struct Env;

#[async_trait]
impl Tool for Env {
    fn name(&self) -> &str {
        "env"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("env", "Print environment variables")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let mut pairs: Vec<(&String, &String)> = ctx.env.iter().collect();
        pairs.sort();
        let lines: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
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
    async fn env_lists_sorted_pairs() {
        let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
        let mut ctx = ExecContext::new(ws, "/home/guest");

        let result = Env.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.contains("HOME=/home/guest"));
        assert!(result.out.contains("USER=guest"));
        let lines: Vec<&str> = result.out.lines().collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }
}
