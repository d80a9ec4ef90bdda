//! whoami — Print the current user.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Whoami tool: print the session user.
pub struct Whoami;

#[async_trait]
impl Tool for Whoami {
    fn name(&self) -> &str {
        "whoami"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("whoami", "Print the current user")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let user = ctx.env.get("USER").cloned().unwrap_or_else(|| "guest".into());
        ExecResult::success(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn whoami_reads_env() {
        let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
        let mut ctx = ExecContext::new(ws, "/home/guest");
        ctx.env.insert("USER".into(), "amy".into());

        let result = Whoami.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(result.out, "amy");
    }
}
