//! Core tool traits and types.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use loft_types::ExecResult;

use super::context::ExecContext;

/// Schema for a tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSchema {
    /// Parameter name.
    pub name: String,
    /// Type hint (string, int, bool).
    pub param_type: String,
    /// Whether this parameter is required.
    pub required: bool,
    /// Description for help text.
    pub description: String,
    /// Flag aliases, e.g. `-n` for `lines`.
    pub aliases: Vec<String>,
}

impl ParamSchema {
    /// Create a required parameter.
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: true,
            description: description.into(),
            aliases: Vec::new(),
        }
    }

    /// Create an optional parameter.
    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: false,
            description: description.into(),
            aliases: Vec::new(),
        }
    }

    /// Add flag aliases (with or without the leading dash).
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases
            .into_iter()
            .map(|a| a.into().trim_start_matches('-').to_string())
            .collect();
        self
    }

    pub fn is_bool(&self) -> bool {
        self.param_type == "bool"
    }
}

/// Schema describing a tool's interface.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Tool name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Parameter definitions.
    pub params: Vec<ParamSchema>,
}

impl ToolSchema {
    /// Create a new tool schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter to the schema.
    pub fn param(mut self, param: ParamSchema) -> Self {
        self.params.push(param);
        self
    }

    /// Find the parameter a flag token refers to, by name or alias.
    pub fn param_for_flag(&self, flag: &str) -> Option<&ParamSchema> {
        self.params
            .iter()
            .find(|p| p.name == flag || p.aliases.iter().any(|a| a == flag))
    }
}

/// Parsed arguments ready for tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Positional arguments in order.
    pub positional: Vec<String>,
    /// Named arguments by canonical parameter name (from `-n 5` style
    /// value flags).
    pub named: HashMap<String, String>,
    /// Boolean flags (from `-l`, `-la`, `--force`).
    pub flags: HashSet<String>,
}

impl ToolArgs {
    /// Create empty args.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a named argument or positional fallback.
    pub fn get_string(&self, name: &str, positional_index: usize) -> Option<String> {
        self.named
            .get(name)
            .cloned()
            .or_else(|| self.positional.get(positional_index).cloned())
    }

    /// Get a named argument parsed as a count.
    pub fn get_usize(&self, name: &str) -> Option<usize> {
        self.named.get(name).and_then(|v| v.parse().ok())
    }

    /// Check if a flag is set.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

/// A tool that can be executed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name (used for lookup).
    fn name(&self) -> &str;

    /// Get the tool's schema.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments and context.
    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_for_flag_matches_name_and_alias() {
        let schema = ToolSchema::new("head", "test")
            .param(ParamSchema::optional("lines", "int", "line count").with_aliases(["-n"]));
        assert!(schema.param_for_flag("lines").is_some());
        assert!(schema.param_for_flag("n").is_some());
        assert!(schema.param_for_flag("x").is_none());
    }

    #[test]
    fn args_fall_back_to_positional() {
        let mut args = ToolArgs::new();
        args.positional.push("file.txt".into());
        assert_eq!(args.get_string("path", 0).as_deref(), Some("file.txt"));
        args.named.insert("path".into(), "other.txt".into());
        assert_eq!(args.get_string("path", 0).as_deref(), Some("other.txt"));
    }

    #[test]
    fn get_usize_parses_counts() {
        let mut args = ToolArgs::new();
        args.named.insert("lines".into(), "5".into());
        assert_eq!(args.get_usize("lines"), Some(5));
        args.named.insert("lines".into(), "nope".into());
        assert_eq!(args.get_usize("lines"), None);
    }
}
