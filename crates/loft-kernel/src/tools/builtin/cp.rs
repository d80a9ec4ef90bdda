//! cp — Copy files and directories.

use async_trait::async_trait;

use loft_types::{ExecResult, FsResult, NodeKind};

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};
use crate::workspace::{NodeId, Workspace};

/// Cp tool: copy a file, or a directory tree with `-r`.
pub struct Cp;

#[async_trait]
impl Tool for Cp {
    fn name(&self) -> &str {
        "cp"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cp", "Copy files and directories")
            .param(ParamSchema::required("source", "string", "Path to copy from"))
            .param(ParamSchema::required("dest", "string", "Path to copy to"))
            .param(
                ParamSchema::optional("recursive", "bool", "Copy directories recursively (-r)")
                    .with_aliases(["-r", "-R"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (source, dest) = match (args.get_string("source", 0), args.get_string("dest", 1)) {
            (Some(s), Some(d)) => (s, d),
            _ => return ExecResult::failure(1, "cp: missing source or destination"),
        };
        let recursive = args.has_flag("recursive") || args.has_flag("r") || args.has_flag("R");

        let mut ws = ctx.ws.lock().await;
        let src = match ws.resolve_path(&source, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("cp: {}: no such file", source)),
        };
        let src_node = match ws.tree().node(src) {
            Ok(n) => n,
            Err(e) => return ExecResult::failure(1, format!("cp: {}: {}", source, e)),
        };
        if src_node.is_dir() && !recursive {
            return ExecResult::failure(1, format!("cp: {}: is a directory (use -r)", source));
        }
        let src_name = src_node.name.clone();

        // Destination: an existing directory receives the copy under the
        // source name; otherwise the copy takes the destination's basename
        // inside the destination's parent.
        let (target_parent, target_name) = match ws.resolve_path(&dest, &ctx.cwd) {
            Some(id) if ws.tree().node(id).map(|n| n.is_dir()).unwrap_or(false) => {
                (id, src_name)
            }
            Some(_) => return ExecResult::failure(1, format!("cp: {}: already exists", dest)),
            None => {
                let abs = ws.absolutize(&dest, &ctx.cwd);
                let parent_path = abs.parent().map(|p| p.to_path_buf()).unwrap_or_default();
                let name = match abs.file_name().and_then(|n| n.to_str()) {
                    Some(n) => n.to_string(),
                    None => return ExecResult::failure(1, format!("cp: {}: invalid path", dest)),
                };
                match ws.tree().resolve(&parent_path) {
                    Some(p) => (p, name),
                    None => {
                        return ExecResult::failure(
                            1,
                            format!("cp: {}: no such directory", parent_path.display()),
                        )
                    }
                }
            }
        };

        if target_parent == src || ws.tree().is_ancestor(src, target_parent) {
            return ExecResult::failure(
                1,
                format!("cp: cannot copy {} into itself", source),
            );
        }

        match copy_subtree(&mut ws, src, target_parent, &target_name).await {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("cp: {}: {}", dest, e)),
        }
    }
}

/// One node in a copy plan: path segments below the source, kind, content.
type PlanEntry = (Vec<String>, NodeKind, String);

/// Deep-copy a subtree. The structure is snapshotted first so the copy
/// cannot observe itself, then replayed through workspace ops (which keeps
/// the write-through rule intact when a bridge is bound).
async fn copy_subtree(
    ws: &mut Workspace,
    src: NodeId,
    target_parent: NodeId,
    target_name: &str,
) -> FsResult<()> {
    let mut plan: Vec<PlanEntry> = Vec::new();
    let mut stack: Vec<(NodeId, Vec<String>)> = vec![(src, Vec::new())];
    while let Some((id, rel)) = stack.pop() {
        let (kind, content, children) = {
            let node = ws.tree().node(id)?;
            (node.kind, node.content().to_string(), node.children.clone())
        };
        plan.push((rel.clone(), kind, content));
        for child in children {
            let child_name = ws.tree().node(child)?.name.clone();
            let mut child_rel = rel.clone();
            child_rel.push(child_name);
            stack.push((child, child_rel));
        }
    }
    plan.sort_by_key(|(rel, _, _)| rel.len());

    for (rel, kind, content) in plan {
        // The copied root lives at target_parent/target_name; descendants
        // hang below it along their recorded segments.
        let mut parent = target_parent;
        if !rel.is_empty() {
            parent = ws
                .tree()
                .child_by_name(parent, target_name)
                .ok_or_else(|| loft_types::FsError::NotFound(target_name.to_string()))?;
            for seg in &rel[..rel.len() - 1] {
                parent = ws
                    .tree()
                    .child_by_name(parent, seg)
                    .ok_or_else(|| loft_types::FsError::NotFound(seg.clone()))?;
            }
        }
        let name = rel.last().map(|s| s.as_str()).unwrap_or(target_name);
        let id = ws.create(parent, name, kind).await?;
        if kind.is_file() && !content.is_empty() {
            ws.set_content(id, &content).await?;
        }
    }
    Ok(())
}
