//! find — Search for nodes by name.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Find tool: recursive name-substring search below a starting path.
///
/// `find <pattern>` searches from the working directory;
/// `find <path> <pattern>` searches from `path`.
pub struct Find;

#[async_trait]
impl Tool for Find {
    fn name(&self) -> &str {
        "find"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("find", "Search for files and directories by name")
            .param(ParamSchema::optional("path", "string", "Directory to search from"))
            .param(ParamSchema::required("pattern", "string", "Name substring to match"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (start, pattern) = match args.positional.len() {
            0 => return ExecResult::failure(1, "find: missing pattern"),
            1 => (".".to_string(), args.positional[0].clone()),
            _ => (args.positional[0].clone(), args.positional[1].clone()),
        };

        let ws = ctx.ws.lock().await;
        let root = match ws.resolve_path(&start, &ctx.cwd) {
            Some(id) => id,
            None => return ExecResult::failure(1, format!("find: {}: not found", start)),
        };

        let mut matches: Vec<String> = ws
            .tree()
            .subtree_ids(root)
            .into_iter()
            .filter(|&id| {
                ws.tree()
                    .get(id)
                    .map(|n| n.name.contains(&pattern))
                    .unwrap_or(false)
            })
            .map(|id| ws.tree().path_of(id).display().to_string())
            .collect();
        matches.sort();

        ExecResult::success(matches.join("\n"))
    }
}
