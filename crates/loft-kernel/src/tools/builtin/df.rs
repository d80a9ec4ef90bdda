//! df — Filesystem usage (static).
//!
//! The workspace has no block devices; this prints a fixed placeholder,
//! kept for command-surface parity.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Df tool: static placeholder filesystem table.
pub struct Df;

const DF_OUTPUT: &str = "\
Filesystem     1K-blocks    Used Available Use% Mounted on
workspace        1048576   24576   1024000   3% /
memfs             524288       0    524288   0% /tmp";

#[async_trait]
impl Tool for Df {
    fn name(&self) -> &str {
        "df"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("df", "Report filesystem usage")
    }

    async fn execute(&self, _args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(DF_OUTPUT)
    }
}
