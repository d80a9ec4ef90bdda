//! The shell interpreter.
//!
//! One [`ShellSession`] per terminal instance: its own working directory,
//! bounded history, and scrollback. A line goes through
//! Idle → Parsing → Dispatching → Idle: whitespace tokenization (no
//! quoting, escaping, or redirection), case-insensitive lookup in the
//! builtin table, handler execution, scrollback append. Only the two
//! delegation builtins (`ai`, `git`) finish their scrollback entry late.

mod history;

pub use history::{HistoryCursor, HistoryRing};

use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use loft_types::ExecResult;

use crate::git::GitCollaborator;
use crate::tools::{ExecContext, LateWriter, ToolArgs, ToolRegistry, ToolSchema};
use crate::workspace::Workspace;

/// One executed command in a session's transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollEntry {
    pub command: String,
    pub output: String,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
    /// Session-unique sequence number; late output is addressed to it.
    #[serde(default)]
    pub seq: u64,
}

impl ScrollEntry {
    pub fn new(command: String, output: String, is_error: bool) -> Self {
        Self {
            command,
            output,
            is_error,
            timestamp: Utc::now(),
            seq: 0,
        }
    }
}

/// One interpreter instance.
pub struct ShellSession {
    name: String,
    ctx: ExecContext,
    registry: Arc<ToolRegistry>,
    history: HistoryRing,
    scrollback: Arc<StdMutex<Vec<ScrollEntry>>>,
    next_seq: u64,
}

impl ShellSession {
    /// Create a session over a shared workspace, starting in `home`.
    pub fn new(
        name: impl Into<String>,
        ws: Arc<Mutex<Workspace>>,
        registry: Arc<ToolRegistry>,
        home: impl Into<std::path::PathBuf>,
    ) -> Self {
        let mut ctx = ExecContext::new(ws, home);
        ctx.set_tool_schemas(registry.schemas());
        Self {
            name: name.into(),
            ctx,
            registry,
            history: HistoryRing::default(),
            scrollback: Arc::new(StdMutex::new(Vec::new())),
            next_seq: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a git collaborator to this session.
    pub fn set_git(&mut self, git: Arc<dyn GitCollaborator>) {
        self.ctx.set_git(git);
    }

    /// The session's current working directory.
    pub fn cwd(&self) -> &std::path::Path {
        &self.ctx.cwd
    }

    /// The bounded history, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.entries()
    }

    /// A navigation cursor over the history ring.
    pub fn history_cursor(&self) -> HistoryCursor<'_> {
        self.history.cursor()
    }

    /// Snapshot of the scrollback transcript.
    pub fn scrollback(&self) -> Vec<ScrollEntry> {
        self.scrollback.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Restore transcript and history (session persistence).
    pub fn restore(&mut self, history: Vec<String>, scrollback: Vec<ScrollEntry>) {
        for line in &history {
            self.history.push(line);
        }
        if let Ok(mut entries) = self.scrollback.lock() {
            *entries = scrollback;
            self.next_seq = entries.iter().map(|e| e.seq + 1).max().unwrap_or(0);
        }
    }

    /// The completion vocabulary: builtin names matching `prefix`.
    /// Accepting a suggestion replaces the input with `"<command> "`.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.registry
            .names()
            .into_iter()
            .filter(|name| name.starts_with(&prefix.to_ascii_lowercase()))
            .map(|name| format!("{} ", name))
            .collect()
    }

    /// Schemas of every builtin (for front-ends).
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.ctx.tool_schemas.clone()
    }

    /// Execute one input line and record it.
    #[tracing::instrument(level = "debug", skip(self), fields(session = %self.name))]
    pub async fn run_line(&mut self, line: &str) -> ExecResult {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ExecResult::success("");
        }
        self.history.push(trimmed);

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let command = tokens[0].to_ascii_lowercase();

        // The entry exists before dispatch so a deferred completion always
        // has somewhere to land.
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Ok(mut entries) = self.scrollback.lock() {
            let mut entry = ScrollEntry::new(trimmed.to_string(), String::new(), false);
            entry.seq = seq;
            entries.push(entry);
        }

        let result = match self.registry.get(&command) {
            Some(tool) => {
                let args = build_args(&tokens[1..], &tool.schema());
                self.ctx.late = Some(LateWriter::new(self.scrollback.clone(), seq));
                self.ctx.history = self.history.entries();
                tool.execute(args, &mut self.ctx).await
            }
            None => ExecResult::failure(
                127,
                format!("{}: command not found (try 'help')", command),
            ),
        };
        self.ctx.late = None;

        if self.ctx.clear_requested {
            self.ctx.clear_requested = false;
            if let Ok(mut entries) = self.scrollback.lock() {
                entries.clear();
            }
            return result;
        }

        // The command's own output leads the entry; anything a deferred
        // completion managed to append already stays after it.
        if let Ok(mut entries) = self.scrollback.lock() {
            if let Some(entry) = entries.iter_mut().find(|e| e.seq == seq) {
                let text = result.display_text();
                if entry.output.is_empty() {
                    entry.output = text.to_string();
                } else if !text.is_empty() {
                    entry.output = format!("{}\n{}", text, entry.output);
                }
                entry.is_error = entry.is_error || !result.ok();
            }
        }
        result
    }
}

/// Build tool arguments from raw tokens, schema-aware.
///
/// Flag tokens are split from positionals: `--name` and `-x` consult the
/// schema — a non-bool parameter consumes the next token as its value
/// (`-n 5`), a bool one becomes a flag. Combined short flags (`-la`)
/// explode into individual flags. Everything else stays positional.
pub fn build_args(tokens: &[&str], schema: &ToolSchema) -> ToolArgs {
    let mut args = ToolArgs::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if let Some(name) = token.strip_prefix("--") {
            consume_flag(&mut args, schema, name, tokens, &mut i);
        } else if let Some(name) = token.strip_prefix('-') {
            if name.len() > 1 {
                // Combined short flags are always boolean.
                for c in name.chars() {
                    args.flags.insert(c.to_string());
                }
            } else if !name.is_empty() {
                consume_flag(&mut args, schema, name, tokens, &mut i);
            } else {
                // A bare "-" is positional (`cd -`).
                args.positional.push(token.to_string());
            }
        } else {
            args.positional.push(token.to_string());
        }
        i += 1;
    }
    args
}

fn consume_flag(
    args: &mut ToolArgs,
    schema: &ToolSchema,
    name: &str,
    tokens: &[&str],
    i: &mut usize,
) {
    match schema.param_for_flag(name) {
        Some(param) if !param.is_bool() && *i + 1 < tokens.len() => {
            args.named
                .insert(param.name.clone(), tokens[*i + 1].to_string());
            *i += 1;
        }
        _ => {
            args.flags.insert(name.to_string());
        }
    }
}
