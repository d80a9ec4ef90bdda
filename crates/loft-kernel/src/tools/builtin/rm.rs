//! rm — Remove files and directories.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Rm tool: remove a file, or a directory tree with `-r`.
///
/// Removing a non-empty directory without the recursive flag is refused and
/// leaves the tree unchanged.
pub struct Rm;

#[async_trait]
impl Tool for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("rm", "Remove files and directories")
            .param(ParamSchema::required("path", "string", "Path to remove"))
            .param(
                ParamSchema::optional("recursive", "bool", "Remove directory contents (-r)")
                    .with_aliases(["-r", "-R"]),
            )
            .param(
                ParamSchema::optional("force", "bool", "Ignore missing paths (-f)")
                    .with_aliases(["-f"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.get_string("path", 0) {
            Some(p) => p,
            None => return ExecResult::failure(1, "rm: missing path argument"),
        };
        let recursive = args.has_flag("recursive") || args.has_flag("r") || args.has_flag("R");
        let force = args.has_flag("force") || args.has_flag("f");

        let mut ws = ctx.ws.lock().await;
        let id = match ws.resolve_path(&path, &ctx.cwd) {
            Some(id) => id,
            None if force => return ExecResult::success(""),
            None => return ExecResult::failure(1, format!("rm: {}: no such file", path)),
        };

        match ws.delete(id, recursive).await {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("rm: {}: {}", path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use loft_types::NodeKind;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn make_ctx() -> ExecContext {
        let mut ws = Workspace::new("/home/guest");
        let root = ws.tree().root();
        ws.create(root, "file.txt", NodeKind::File).await.unwrap();
        ws.create(root, "emptydir", NodeKind::Directory).await.unwrap();
        let full = ws.create(root, "fulldir", NodeKind::Directory).await.unwrap();
        ws.create(full, "inner.txt", NodeKind::File).await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn rm_file() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/file.txt".into());

        let result = Rm.execute(args, &mut ctx).await;
        assert!(result.ok());
        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/file.txt", Path::new("/")).is_none());
    }

    #[tokio::test]
    async fn rm_empty_dir() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/emptydir".into());

        let result = Rm.execute(args, &mut ctx).await;
        assert!(result.ok());
    }

    #[tokio::test]
    async fn rm_non_empty_dir_without_r_fails_and_preserves_tree() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/fulldir".into());

        let result = Rm.execute(args, &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("not empty"));

        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/fulldir", Path::new("/")).is_some());
        assert!(ws.resolve_path("/fulldir/inner.txt", Path::new("/")).is_some());
    }

    #[tokio::test]
    async fn rm_r_removes_tree() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/fulldir".into());
        args.flags.insert("r".into());

        let result = Rm.execute(args, &mut ctx).await;
        assert!(result.ok());
        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/fulldir", Path::new("/")).is_none());
        assert!(ws.resolve_path("/fulldir/inner.txt", Path::new("/")).is_none());
    }

    #[tokio::test]
    async fn rm_missing_fails_unless_forced() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/nope".into());
        let result = Rm.execute(args, &mut ctx).await;
        assert!(!result.ok());

        let mut args = ToolArgs::new();
        args.positional.push("/nope".into());
        args.flags.insert("f".into());
        let result = Rm.execute(args, &mut ctx).await;
        assert!(result.ok());
    }
}
