//! cat — Concatenate and print files.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Cat tool: print one or more files.
///
/// With more than one path each file gets a `==> name <==` header, and a
/// failure on one file does not abort the rest — the error is reported and
/// the command moves on.
pub struct Cat;

#[async_trait]
impl Tool for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cat", "Print file contents")
            .param(ParamSchema::required("path", "string", "File path(s) to read"))
            .param(
                ParamSchema::optional("number", "bool", "Number output lines (-n)")
                    .with_aliases(["-n"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.positional.is_empty() {
            return ExecResult::failure(1, "cat: missing path argument");
        }
        let number = args.has_flag("number") || args.has_flag("n");
        let multi = args.positional.len() > 1;

        let ws = ctx.ws.lock().await;
        let mut out = String::new();
        let mut errs = Vec::new();
        let mut line_num = 1;

        for path in &args.positional {
            let node = ws
                .resolve_path(path, &ctx.cwd)
                .and_then(|id| ws.tree().get(id));
            match node {
                Some(node) if node.is_dir() => {
                    errs.push(format!("cat: {}: is a directory", path));
                }
                Some(node) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    if multi {
                        out.push_str(&format!("==> {} <==\n", path));
                    }
                    if number {
                        let numbered: Vec<String> = node
                            .content()
                            .lines()
                            .map(|line| {
                                let s = format!("{:6}\t{}", line_num, line);
                                line_num += 1;
                                s
                            })
                            .collect();
                        out.push_str(&numbered.join("\n"));
                    } else {
                        out.push_str(node.content());
                    }
                }
                None => {
                    errs.push(format!("cat: {}: no such file", path));
                }
            }
        }

        if errs.is_empty() {
            ExecResult::success(out)
        } else {
            ExecResult::from_output(1, out, errs.join("\n"))
        }
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
        let one = ws.create(root, "one.txt", NodeKind::File).await.unwrap();
        ws.set_content(one, "hello world").await.unwrap();
        let two = ws.create(root, "two.txt", NodeKind::File).await.unwrap();
        ws.set_content(two, "line1\nline2").await.unwrap();
        ws.create(root, "dir", NodeKind::Directory).await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn cat_single_file() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/one.txt".into());

        let result = Cat.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "hello world");
    }

    #[tokio::test]
    async fn cat_multiple_files_have_headers() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/one.txt".into());
        args.positional.push("/two.txt".into());

        let result = Cat.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.contains("==> /one.txt <=="));
        assert!(result.out.contains("==> /two.txt <=="));
        assert!(result.out.contains("hello world"));
        assert!(result.out.contains("line2"));
    }

    #[tokio::test]
    async fn cat_continues_past_per_file_errors() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/missing.txt".into());
        args.positional.push("/dir".into());
        args.positional.push("/one.txt".into());

        let result = Cat.execute(args, &mut ctx).await;
        assert!(!result.ok());
        // The good file still printed.
        assert!(result.out.contains("hello world"));
        assert!(result.err.contains("cat: /missing.txt: no such file"));
        assert!(result.err.contains("cat: /dir: is a directory"));
    }

    #[tokio::test]
    async fn cat_numbers_lines_continuously() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/two.txt".into());
        args.positional.push("/one.txt".into());
        args.flags.insert("n".into());

        let result = Cat.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert!(result.out.contains("1\tline1"));
        assert!(result.out.contains("2\tline2"));
        // Numbering continues across files.
        assert!(result.out.contains("3\thello world"));
    }

    #[tokio::test]
    async fn cat_no_args_fails() {
        let mut ctx = make_ctx().await;
        let result = Cat.execute(ToolArgs::new(), &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("missing"));
    }
}
