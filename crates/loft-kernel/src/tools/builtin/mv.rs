//! mv — Move or rename files and directories.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Mv tool: rename within a parent, or move across parents.
///
/// Inherits the workspace's move guards: moving a node into itself or a
/// descendant, or onto a same-named sibling, is rejected with the tree
/// unchanged.
pub struct Mv;

#[async_trait]
impl Tool for Mv {
    fn name(&self) -> &str {
        "mv"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("mv", "Move or rename files and directories")
            .param(ParamSchema::required("source", "string", "Path to move"))
            .param(ParamSchema::required("dest", "string", "Destination path"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (source, dest) = match (args.get_string("source", 0), args.get_string("dest", 1)) {
            (Some(s), Some(d)) => (s, d),
            _ => return ExecResult::failure(1, "mv: missing source or destination"),
        };

        let mut ws = ctx.ws.lock().await;
        let src = match ws.resolve_path(&source, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("mv: {}: no such file", source)),
        };

        // An existing directory destination receives the node under its
        // current name.
        if let Some(dest_id) = ws.resolve_path(&dest, &ctx.cwd) {
            if ws.tree().node(dest_id).map(|n| n.is_dir()).unwrap_or(false) {
                return match ws.relocate(src, dest_id).await {
                    Ok(()) => ExecResult::success(""),
                    Err(e) => ExecResult::failure(1, format!("mv: {}: {}", source, e)),
                };
            }
            return ExecResult::failure(1, format!("mv: {}: already exists", dest));
        }

        // Otherwise the destination names the node: same parent is a pure
        // rename, a different parent is a move plus rename.
        let abs = ws.absolutize(&dest, &ctx.cwd);
        let parent_path = abs.parent().map(|p| p.to_path_buf()).unwrap_or_default();
        let new_name = match abs.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => return ExecResult::failure(1, format!("mv: {}: invalid path", dest)),
        };
        let new_parent = match ws.tree().resolve(&parent_path) {
            Some(p) => p,
            None => {
                return ExecResult::failure(
                    1,
                    format!("mv: {}: no such directory", parent_path.display()),
                )
            }
        };

        let current_parent = ws.tree().node(src).ok().and_then(|n| n.parent);
        if current_parent != Some(new_parent) {
            if let Err(e) = ws.relocate(src, new_parent).await {
                return ExecResult::failure(1, format!("mv: {}: {}", source, e));
            }
        }
        let current_name = ws.tree().node(src).map(|n| n.name.clone()).unwrap_or_default();
        if current_name != new_name {
            if let Err(e) = ws.rename(src, &new_name).await {
                return ExecResult::failure(1, format!("mv: {}: {}", source, e));
            }
        }
        ExecResult::success("")
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
        let f = ws.create(root, "file.txt", NodeKind::File).await.unwrap();
        ws.set_content(f, "data").await.unwrap();
        let x = ws.create(root, "x", NodeKind::Directory).await.unwrap();
        ws.create(x, "y", NodeKind::Directory).await.unwrap();
        ws.create(root, "dest", NodeKind::Directory).await.unwrap();
        ExecContext::new(Arc::new(Mutex::new(ws)), "/")
    }

    #[tokio::test]
    async fn mv_renames_in_place() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/file.txt".into());
        args.positional.push("/renamed.txt".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(result.ok(), "{}", result.err);
        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/renamed.txt", Path::new("/")).is_some());
        assert!(ws.resolve_path("/file.txt", Path::new("/")).is_none());
    }

    #[tokio::test]
    async fn mv_into_directory_keeps_name() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/file.txt".into());
        args.positional.push("/dest".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(result.ok());
        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/dest/file.txt", Path::new("/")).is_some());
    }

    #[tokio::test]
    async fn mv_across_parents_with_rename() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/file.txt".into());
        args.positional.push("/dest/other.txt".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(result.ok(), "{}", result.err);
        let ws = ctx.ws.lock().await;
        let id = ws.resolve_path("/dest/other.txt", Path::new("/")).unwrap();
        assert_eq!(ws.tree().node(id).unwrap().content(), "data");
        ws.tree().check_invariants().unwrap();
    }

    #[tokio::test]
    async fn mv_into_own_descendant_is_invalid() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/x".into());
        args.positional.push("/x/y".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("invalid move"));

        // Tree unchanged.
        let ws = ctx.ws.lock().await;
        assert!(ws.resolve_path("/x/y", Path::new("/")).is_some());
        ws.tree().check_invariants().unwrap();
    }

    #[tokio::test]
    async fn mv_onto_existing_file_fails() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/x".into());
        args.positional.push("/file.txt".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("already exists"));
    }

    #[tokio::test]
    async fn mv_missing_source_fails() {
        let mut ctx = make_ctx().await;
        let mut args = ToolArgs::new();
        args.positional.push("/ghost".into());
        args.positional.push("/dest".into());

        let result = Mv.execute(args, &mut ctx).await;
        assert!(!result.ok());
    }
}
