//! wc — Count lines, words, and bytes.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Wc tool: line, word, and byte counts. With no flags all three print.
pub struct Wc;

#[async_trait]
impl Tool for Wc {
    fn name(&self) -> &str {
        "wc"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("wc", "Count lines, words, and bytes")
            .param(ParamSchema::required("path", "string", "File to count"))
            .param(ParamSchema::optional("lines", "bool", "Line count only (-l)").with_aliases(["-l"]))
            .param(ParamSchema::optional("words", "bool", "Word count only (-w)").with_aliases(["-w"]))
            .param(ParamSchema::optional("bytes", "bool", "Byte count only (-c)").with_aliases(["-c"]))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.get_string("path", 0) {
            Some(p) => p,
            None => return ExecResult::failure(1, "wc: missing path argument"),
        };

        let ws = ctx.ws.lock().await;
        let node = match ws
            .resolve_path(&path, &ctx.cwd)
            .and_then(|id| ws.tree().get(id))
        {
            Some(n) if n.is_dir() => {
                return ExecResult::failure(1, format!("wc: {}: is a directory", path))
            }
            Some(n) => n,
            None => return ExecResult::failure(1, format!("wc: {}: no such file", path)),
        };

        let content = node.content();
        let lines = content.lines().count();
        let words = content.split_whitespace().count();
        let bytes = content.len();

        let want_lines = args.has_flag("lines") || args.has_flag("l");
        let want_words = args.has_flag("words") || args.has_flag("w");
        let want_bytes = args.has_flag("bytes") || args.has_flag("c");
        let all = !(want_lines || want_words || want_bytes);

        let mut cols = Vec::new();
        if all || want_lines {
            cols.push(format!("{:>7}", lines));
        }
        if all || want_words {
            cols.push(format!("{:>7}", words));
        }
        if all || want_bytes {
            cols.push(format!("{:>7}", bytes));
        }
        cols.push(format!(" {}", path));
        ExecResult::success(cols.concat())
    }
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
        let f = ws.create(root, "text.txt", NodeKind::File).await.unwrap();
        ws.set_content(f, "one two\nthree\n").await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn wc_all_counts() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/text.txt".into());

        let result = Wc.execute(args, &mut ctx).await;
        assert!(result.ok());
        // 2 lines, 3 words, 14 bytes.
        let fields: Vec<&str> = result.out.split_whitespace().collect();
        assert_eq!(fields, vec!["2", "3", "14", "/text.txt"]);
    }

    #[tokio::test]
    async fn wc_lines_only() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/text.txt".into());
        args.flags.insert("l".into());

        let result = Wc.execute(args, &mut ctx).await;
        let fields: Vec<&str> = result.out.split_whitespace().collect();
        assert_eq!(fields, vec!["2", "/text.txt"]);
    }

    #[tokio::test]
    async fn wc_directory_fails() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/home".into());

        let result = Wc.execute(args, &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("is a directory"));
    }
}
