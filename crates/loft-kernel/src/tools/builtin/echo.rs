//! echo — Print arguments.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Echo tool: print arguments separated by spaces.
pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("echo", "Print arguments")
            .param(ParamSchema::optional("args", "string", "Text to print"))
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(args.positional.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn make_ctx() -> ExecContext {
        let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
        ExecContext::new(ws, "/home/guest")
    }

    #[tokio::test]
    async fn echo_joins_arguments() {
        let mut ctx = make_ctx();
        let mut args = ToolArgs::new();
        args.positional.push("hello".into());
        args.positional.push("world".into());

        let result = Echo.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "hello world");
    }

    #[tokio::test]
    async fn echo_no_args_is_empty() {
        let mut ctx = make_ctx();
        let result = Echo.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "");
    }
}
