//! ps — Process listing (static).
//!
//! There is no process table in a browser-hosted workspace; this prints a
//! fixed placeholder, kept for command-surface parity.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Ps tool: static placeholder process listing.
pub struct Ps;

const PS_OUTPUT: &str = "\
  PID TTY          TIME CMD
    1 tty1     00:00:01 loft
   17 tty1     00:00:00 shell
   42 tty1     00:00:00 ps";

#[async_trait]
impl Tool for Ps {
    fn name(&self) -> &str {
        "ps"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("ps", "List processes")
    }

    async fn execute(&self, _args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(PS_OUTPUT)
    }
}
