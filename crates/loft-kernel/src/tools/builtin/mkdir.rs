//! mkdir — Create directories.

use async_trait::async_trait;
use std::path::Component;

use loft_types::{ExecResult, NodeKind};

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Mkdir tool: create a directory.
pub struct Mkdir;

#[async_trait]
impl Tool for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("mkdir", "Create a directory")
            .param(ParamSchema::required("path", "string", "Directory to create"))
            .param(
                ParamSchema::optional("parents", "bool", "Create parent directories as needed (-p)")
                    .with_aliases(["-p"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.get_string("path", 0) {
            Some(p) => p,
            None => return ExecResult::failure(1, "mkdir: missing path argument"),
        };
        let parents = args.has_flag("parents") || args.has_flag("p");

        let abs = ctx.resolve_path(&path);
        let mut ws = ctx.ws.lock().await;

        if !parents {
            let parent_path = abs.parent().map(|p| p.to_path_buf()).unwrap_or_default();
            let name = match abs.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => return ExecResult::failure(1, format!("mkdir: {}: invalid path", path)),
            };
            let parent = match ws.tree().resolve(&parent_path) {
                Some(p) => p,
                None => {
                    return ExecResult::failure(
                        1,
                        format!("mkdir: {}: no such directory", parent_path.display()),
                    )
                }
            };
            return match ws.create(parent, &name, NodeKind::Directory).await {
                Ok(_) => ExecResult::success(""),
                Err(e) => ExecResult::failure(1, format!("mkdir: {}: {}", path, e)),
            };
        }

        // -p walks the path creating each missing segment; existing
        // directories are fine.
        let mut current = ws.tree().root();
        for component in abs.components() {
            let seg = match component {
                Component::Normal(seg) => seg.to_string_lossy().into_owned(),
                _ => continue,
            };
            current = match ws.tree().child_by_name(current, &seg) {
                Some(id) => id,
                None => match ws.create(current, &seg, NodeKind::Directory).await {
                    Ok(id) => id,
                    Err(e) => return ExecResult::failure(1, format!("mkdir: {}: {}", path, e)),
                },
            };
        }
        ExecResult::success("")
    }
}
