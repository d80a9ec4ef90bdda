//! ls — List directory contents.

use async_trait::async_trait;
use chrono::{DateTime, Local};

use loft_types::{EntryInfo, ExecResult};

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Ls tool: list directory contents.
pub struct Ls;

#[async_trait]
impl Tool for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("ls", "List directory contents")
            .param(ParamSchema::optional("path", "string", "Directory to list"))
            .param(
                ParamSchema::optional("long", "bool", "Long format with details (-l)")
                    .with_aliases(["-l"]),
            )
            .param(
                ParamSchema::optional("all", "bool", "Include entries starting with . (-a)")
                    .with_aliases(["-a"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = args.get_string("path", 0).unwrap_or_else(|| ".".to_string());
        let long = args.has_flag("long") || args.has_flag("l");
        let all = args.has_flag("all") || args.has_flag("a");

        let ws = ctx.ws.lock().await;
        let id = match ws.resolve_path(&path, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("ls: {}: not found", path)),
        };

        let node = match ws.tree().node(id) {
            Ok(n) => n,
            Err(e) => return ExecResult::failure(1, format!("ls: {}: {}", path, e)),
        };

        // A file lists as itself, like POSIX ls.
        let mut entries: Vec<EntryInfo> = if node.is_dir() {
            ws.list_children(id)
        } else {
            vec![EntryInfo {
                name: node.name.clone(),
                kind: node.kind,
                size: node.size,
                modified: node.modified,
            }]
        };

        entries.retain(|e| all || !e.name.starts_with('.'));
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let lines: Vec<String> = if long {
            entries.iter().map(format_long).collect()
        } else {
            entries.iter().map(|e| e.name.clone()).collect()
        };

        ExecResult::success(lines.join("\n"))
    }
}

/// Fixed-width long row: placeholder permission string, size, date, name.
fn format_long(entry: &EntryInfo) -> String {
    let perms = if entry.is_dir() {
        "drwxr-xr-x"
    } else {
        "-rw-r--r--"
    };
    let when: DateTime<Local> = entry.modified.into();
    format!(
        "{} {:>8}  {}  {}",
        perms,
        entry.size,
        when.format("%b %e %H:%M"),
        entry.name
    )
}
