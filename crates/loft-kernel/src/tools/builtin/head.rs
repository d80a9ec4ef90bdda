//! head — Output the first lines of files.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Head tool: first `-n` lines (default 10), clamped to the file.
pub struct Head;

#[async_trait]
impl Tool for Head {
    fn name(&self) -> &str {
        "head"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("head", "Output the first lines of files")
            .param(ParamSchema::required("path", "string", "File(s) to read"))
            .param(
                ParamSchema::optional("lines", "int", "Number of lines to output (-n)")
                    .with_aliases(["-n"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        read_clamped(&args, ctx, "head", |content, count| {
            content.lines().take(count).collect::<Vec<_>>().join("\n")
        })
        .await
    }
}

/// Shared body for head/tail: resolve files, pick lines, add headers for
/// multiple files.
pub(super) async fn read_clamped(
    args: &ToolArgs,
    ctx: &mut ExecContext,
    cmd: &str,
    pick: impl Fn(&str, usize) -> String,
) -> ExecResult {
    if args.positional.is_empty() {
        return ExecResult::failure(1, format!("{}: missing path argument", cmd));
    }
    let count = args.get_usize("lines").unwrap_or(10);
    let multi = args.positional.len() > 1;

    let ws = ctx.ws.lock().await;
    let mut out = String::new();
    for path in &args.positional {
        let node = ws
            .resolve_path(path, &ctx.cwd)
            .and_then(|id| ws.tree().get(id));
        match node {
            Some(node) if node.is_dir() => {
                return ExecResult::failure(1, format!("{}: {}: is a directory", cmd, path))
            }
            Some(node) => {
                if !out.is_empty() {
                    out.push('\n');
                }
                if multi {
                    out.push_str(&format!("==> {} <==\n", path));
                }
                out.push_str(&pick(node.content(), count));
            }
            None => return ExecResult::failure(1, format!("{}: {}: no such file", cmd, path)),
        }
    }
    ExecResult::success(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use loft_types::NodeKind;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn make_ctx() -> ExecContext {
        let mut ws = Workspace::new("/home/guest");
        let root = ws.tree().root();
        let lines = ws.create(root, "lines.txt", NodeKind::File).await.unwrap();
        let content: Vec<String> = (1..=12).map(|i| format!("line {}", i)).collect();
        ws.set_content(lines, &content.join("\n")).await.unwrap();
        let short = ws.create(root, "short.txt", NodeKind::File).await.unwrap();
        ws.set_content(short, "one\ntwo\nthree").await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn head_default_ten_lines() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/lines.txt".into());

        let result = Head.execute(args, &mut ctx).await;
        assert!(result.ok());
        let lines: Vec<&str> = result.out.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "line 1");
        assert_eq!(lines[9], "line 10");
    }

    #[tokio::test]
    async fn head_n_flag() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/lines.txt".into());
        args.named.insert("lines".into(), "3".into());

        let result = Head.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out.lines().count(), 3);
    }

    #[tokio::test]
    async fn head_clamps_to_file_length() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/short.txt".into());
        args.named.insert("lines".into(), "100".into());

        let result = Head.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out.lines().count(), 3);
    }

    #[tokio::test]
    async fn head_multiple_files_have_headers() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/lines.txt".into());
        args.positional.push("/short.txt".into());
        args.named.insert("lines".into(), "2".into());

        let result = Head.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.contains("==> /lines.txt <=="));
        assert!(result.out.contains("==> /short.txt <=="));
    }

    #[tokio::test]
    async fn head_missing_file_fails() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/nope.txt".into());

        let result = Head.execute(args, &mut ctx).await;
        assert!(!result.ok());
    }
}
