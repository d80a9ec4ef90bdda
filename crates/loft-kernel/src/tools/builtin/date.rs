//! date — Print the current date and time.

use async_trait::async_trait;
use chrono::Local;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Date tool: print the current date and time.
pub struct Date;

#[async_trait]
impl Tool for Date {
    fn name(&self) -> &str {
        "date"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("date", "Print the current date and time")
    }

    async fn execute(&self, _args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(Local::now().format("%a %b %e %H:%M:%S %Y").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn date_prints_something_datelike() {
        let ws = Arc::new(Mutex::new(Workspace::new("/")));
        let mut ctx = ExecContext::new(ws, "/");

        let result = Date.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        // Weekday, month, and a time with two colons.
        assert!(result.out.matches(':').count() == 2, "{}", result.out);
    }
}
