//! ai — Delegate a request to the assistant backend (simulated).
//!
//! Prints a processing banner immediately, then appends a canned summary
//! to the same scrollback entry after a fixed simulated delay. This models
//! an asynchronous external call without a real backend: the interpreter
//! accepts the next line while the request is "in flight".

use async_trait::async_trait;
use std::time::Duration;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Simulated time the backend takes to answer.
const AI_DELAY: Duration = Duration::from_millis(900);

const SUBCOMMANDS: &[&str] = &["explain", "fix", "test", "doc", "review"];

/// Ai tool: simulated assistant delegation.
pub struct Ai;

#[async_trait]
impl Tool for Ai {
    fn name(&self) -> &str {
        "ai"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("ai", "Delegate a request to the assistant")
            .param(ParamSchema::required(
                "subcommand",
                "string",
                "Request kind (explain, fix, test, doc, review)",
            ))
            .param(ParamSchema::optional("args", "string", "Request details"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let sub = match args.get_string("subcommand", 0) {
            Some(s) => s,
            None => {
                return ExecResult::failure(
                    1,
                    format!("ai: missing subcommand (try: {})", SUBCOMMANDS.join(", ")),
                )
            }
        };
        if !SUBCOMMANDS.contains(&sub.as_str()) {
            return ExecResult::failure(
                1,
                format!("ai: unknown subcommand '{}' (try: {})", sub, SUBCOMMANDS.join(", ")),
            );
        }

        let detail = args.positional[1..].join(" ");
        let summary = canned_summary(&sub, &detail);

        // The completion appends to this command's own scrollback entry
        // after the simulated delay; without a session there is nowhere to
        // append, so the summary comes back directly.
        match ctx.late.clone() {
            Some(writer) => {
                tokio::spawn(async move {
                    tokio::time::sleep(AI_DELAY).await;
                    writer.append(&summary, false);
                });
                ExecResult::success(format!("[ai] processing '{}' request...", sub))
            }
            None => ExecResult::success(format!(
                "[ai] processing '{}' request...\n{}",
                sub, summary
            )),
        }
    }
}

fn canned_summary(sub: &str, detail: &str) -> String {
    let target = if detail.is_empty() {
        "the current selection".to_string()
    } else {
        format!("'{}'", detail)
    };
    format!(
        "[ai] done: {} request for {} completed. Suggested changes are ready for review.",
        sub, target
    )
}
