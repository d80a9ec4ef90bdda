//! cd — Change working directory.

use async_trait::async_trait;
use std::path::PathBuf;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Cd tool: change the current working directory.
pub struct Cd;

#[async_trait]
impl Tool for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cd", "Change working directory").param(ParamSchema::optional(
            "path",
            "string",
            "Directory to change to (no argument: home, -: previous)",
        ))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        // No argument goes home.
        let path_arg = match args.get_string("path", 0) {
            Some(p) => p,
            None => ctx.home.display().to_string(),
        };

        // `cd -` returns to the previous directory and prints it.
        if path_arg == "-" {
            let prev = match ctx.get_prev_cwd() {
                Some(prev) => prev.clone(),
                None => return ExecResult::failure(1, "cd: OLDPWD not set"),
            };
            ctx.set_cwd(prev.clone());
            return ExecResult::success(prev.display().to_string());
        }

        let ws = ctx.ws.lock().await;
        let id = match ws.resolve_path(&path_arg, &ctx.cwd) {
            Some(id) => id,
            None => {
                return ExecResult::failure(1, format!("cd: {}: no such directory", path_arg))
            }
        };
        match ws.tree().node(id) {
            Ok(node) if node.is_dir() => {
                let target: PathBuf = ws.tree().path_of(id);
                drop(ws);
                ctx.set_cwd(target);
                ExecResult::success("")
            }
            Ok(_) => ExecResult::failure(1, format!("cd: {}: not a directory", path_arg)),
            Err(e) => ExecResult::failure(1, format!("cd: {}: {}", path_arg, e)),
        }
    }
}
