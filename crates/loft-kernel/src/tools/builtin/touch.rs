//! touch — Create an empty file or refresh its timestamp.

use async_trait::async_trait;

use loft_types::{ExecResult, NodeKind};

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Touch tool: create a file if missing, else refresh its modified time.
pub struct Touch;

#[async_trait]
impl Tool for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("touch", "Create an empty file or update its timestamp")
            .param(ParamSchema::required("path", "string", "File to touch"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.get_string("path", 0) {
            Some(p) => p,
            None => return ExecResult::failure(1, "touch: missing path argument"),
        };
        let abs = ctx.resolve_path(&path);
        let mut ws = ctx.ws.lock().await;

        if let Some(id) = ws.tree().resolve(&abs) {
            return match ws.touch(id).await {
                Ok(()) => ExecResult::success(""),
                Err(e) => ExecResult::failure(1, format!("touch: {}: {}", path, e)),
            };
        }

        let parent_path = abs.parent().map(|p| p.to_path_buf()).unwrap_or_default();
        let name = match abs.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => return ExecResult::failure(1, format!("touch: {}: invalid path", path)),
        };
        let parent = match ws.tree().resolve(&parent_path) {
            Some(p) => p,
            None => {
                return ExecResult::failure(
                    1,
                    format!("touch: {}: no such directory", parent_path.display()),
                )
            }
        };
        match ws.create(parent, &name, NodeKind::File).await {
            Ok(_) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("touch: {}: {}", path, e)),
        }
    }
}
