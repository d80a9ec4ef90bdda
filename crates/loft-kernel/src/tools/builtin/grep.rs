//! grep — Search file lines for a literal pattern.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Grep tool: literal per-line substring search.
pub struct Grep;

#[async_trait]
impl Tool for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("grep", "Search file lines for a pattern")
            .param(ParamSchema::required("pattern", "string", "Literal text to find"))
            .param(ParamSchema::required("path", "string", "File(s) to search"))
            .param(
                ParamSchema::optional("ignore_case", "bool", "Case-insensitive match (-i)")
                    .with_aliases(["-i"]),
            )
            .param(
                ParamSchema::optional("line_numbers", "bool", "Prefix matches with line numbers (-n)")
                    .with_aliases(["-n"]),
            )
            .param(
                ParamSchema::optional("invert", "bool", "Select non-matching lines (-v)")
                    .with_aliases(["-v"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.positional.len() < 2 {
            return ExecResult::failure(1, "grep: usage: grep <pattern> <file...>");
        }
        let pattern = args.positional[0].clone();
        let files = &args.positional[1..];
        let ignore_case = args.has_flag("ignore_case") || args.has_flag("i");
        let line_numbers = args.has_flag("line_numbers") || args.has_flag("n");
        let invert = args.has_flag("invert") || args.has_flag("v");
        let needle = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.clone()
        };
        let multi = files.len() > 1;

        let ws = ctx.ws.lock().await;
        let mut out = Vec::new();
        for path in files {
            let node = ws
                .resolve_path(path, &ctx.cwd)
                .and_then(|id| ws.tree().get(id));
            let node = match node {
                Some(n) if n.is_dir() => {
                    return ExecResult::failure(1, format!("grep: {}: is a directory", path))
                }
                Some(n) => n,
                None => return ExecResult::failure(1, format!("grep: {}: no such file", path)),
            };

            for (num, line) in node.content().lines().enumerate() {
                let haystack = if ignore_case {
                    line.to_lowercase()
                } else {
                    line.to_string()
                };
                if haystack.contains(&needle) != invert {
                    let mut rendered = String::new();
                    if multi {
                        rendered.push_str(path);
                        rendered.push(':');
                    }
                    if line_numbers {
                        rendered.push_str(&format!("{}:", num + 1));
                    }
                    rendered.push_str(line);
                    out.push(rendered);
                }
            }
        }

        ExecResult::success(out.join("\n"))
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
        let f = ws.create(root, "log.txt", NodeKind::File).await.unwrap();
        ws.set_content(f, "info: started\nwarn: Retrying\ninfo: done")
            .await
            .unwrap();
        let g = ws.create(root, "other.txt", NodeKind::File).await.unwrap();
        ws.set_content(g, "info: other").await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn grep_finds_literal_substring() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("info".into());
        args.positional.push("/log.txt".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "info: started\ninfo: done");
    }

    #[tokio::test]
    async fn grep_no_match_is_empty() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("nomatch".into());
        args.positional.push("/log.txt".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.is_empty());
    }

    #[tokio::test]
    async fn grep_ignore_case() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("retrying".into());
        args.positional.push("/log.txt".into());
        args.flags.insert("i".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(result.out, "warn: Retrying");
    }

    #[tokio::test]
    async fn grep_line_numbers_and_invert() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("info".into());
        args.positional.push("/log.txt".into());
        args.flags.insert("n".into());
        args.flags.insert("v".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(result.out, "2:warn: Retrying");
    }

    #[tokio::test]
    async fn grep_multiple_files_prefixes_paths() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("info".into());
        args.positional.push("/log.txt".into());
        args.positional.push("/other.txt".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert!(result.out.contains("/log.txt:info: started"));
        assert!(result.out.contains("/other.txt:info: other"));
    }

    #[tokio::test]
    async fn grep_missing_file_fails() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("x".into());
        args.positional.push("/ghost".into());

        let result = Grep.execute(args, &mut ctx).await;
        assert!(!result.ok());
    }
}
