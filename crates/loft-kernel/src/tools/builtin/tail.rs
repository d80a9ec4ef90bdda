//! tail — Output the last lines of files.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

use super::head::read_clamped;

/// Tail tool: last `-n` lines (default 10), clamped to the file.
pub struct Tail;

#[async_trait]
impl Tool for Tail {
    fn name(&self) -> &str {
        "tail"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("tail", "Output the last lines of files")
            .param(ParamSchema::required("path", "string", "File(s) to read"))
            .param(
                ParamSchema::optional("lines", "int", "Number of lines to output (-n)")
                    .with_aliases(["-n"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        read_clamped(&args, ctx, "tail", |content, count| {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(count);
            lines[start..].join("\n")
        })
        .await
    }
}
