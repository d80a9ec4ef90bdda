//! help — Show available commands.

use async_trait::async_trait;

use loft_types::ExecResult;

use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Help tool: list commands, or show one command's parameters.
pub struct Help;

#[async_trait]
impl Tool for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("help", "Show available commands")
            .param(ParamSchema::optional("command", "string", "Command to describe"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        match args.get_string("command", 0) {
            Some(name) => {
                let wanted = name.to_ascii_lowercase();
                match ctx.tool_schemas.iter().find(|s| s.name == wanted) {
                    Some(schema) => {
                        let mut out = format!("{} — {}", schema.name, schema.description);
                        for param in &schema.params {
                            let req = if param.required { "required" } else { "optional" };
                            let aliases = if param.aliases.is_empty() {
                                String::new()
                            } else {
                                format!(
                                    " ({})",
                                    param
                                        .aliases
                                        .iter()
                                        .map(|a| format!("-{}", a))
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                )
                            };
                            out.push_str(&format!(
                                "\n  {}{} [{}, {}]  {}",
                                param.name, aliases, param.param_type, req, param.description
                            ));
                        }
                        ExecResult::success(out)
                    }
                    None => ExecResult::failure(1, format!("help: no such command: {}", name)),
                }
            }
            None => {
                let width = ctx
                    .tool_schemas
                    .iter()
                    .map(|s| s.name.len())
                    .max()
                    .unwrap_or(0);
                let lines: Vec<String> = ctx
                    .tool_schemas
                    .iter()
                    .map(|s| format!("  {:width$}  {}", s.name, s.description, width = width))
                    .collect();
                ExecResult::success(format!("Available commands:\n{}", lines.join("\n")))
            }
        }
    }
}
