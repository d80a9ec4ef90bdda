//! Execution context for tools.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

use crate::git::GitCollaborator;
use crate::shell::ScrollEntry;
use crate::workspace::Workspace;

use super::traits::ToolSchema;

/// Execution context passed to tools.
///
/// Carries the shared workspace, the instance's working directory, and the
/// collaborators a handler may consult. The workspace is behind a tokio
/// mutex — tools lock it per operation, which is what serializes mutations
/// from two shell instances sharing one tree.
pub struct ExecContext {
    /// The shared workspace (VFS core).
    pub ws: Arc<Mutex<Workspace>>,
    /// Current working directory (workspace path).
    pub cwd: PathBuf,
    /// Previous working directory (for `cd -`).
    pub prev_cwd: Option<PathBuf>,
    /// Configured home directory (`~`, `cd` with no argument).
    pub home: PathBuf,
    /// Environment variables for `env`, `whoami`, prompt rendering.
    pub env: HashMap<String, String>,
    /// Optional git collaborator. Absent means `fatal: not a git repository`.
    pub git: Option<Arc<dyn GitCollaborator>>,
    /// Deferred-output writer for the async delegation builtins.
    pub late: Option<LateWriter>,
    /// History snapshot for the `history` builtin (1-based replay).
    pub history: Vec<String>,
    /// Tool schemas for the `help` builtin.
    pub tool_schemas: Vec<ToolSchema>,
    /// Set by `clear`; the session empties its scrollback when it sees this.
    pub clear_requested: bool,
}

impl ExecContext {
    /// Create a context over a shared workspace, starting at `home`.
    pub fn new(ws: Arc<Mutex<Workspace>>, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let mut env = HashMap::new();
        env.insert("HOME".to_string(), home.display().to_string());
        env.insert("USER".to_string(), "guest".to_string());
        env.insert("SHELL".to_string(), "/bin/loft".to_string());
        env.insert("TERM".to_string(), "xterm-256color".to_string());
        Self {
            ws,
            cwd: home.clone(),
            prev_cwd: None,
            home,
            env,
            git: None,
            late: None,
            history: Vec::new(),
            tool_schemas: Vec::new(),
            clear_requested: false,
        }
    }

    /// Attach a git collaborator.
    pub fn set_git(&mut self, git: Arc<dyn GitCollaborator>) {
        self.git = Some(git);
    }

    /// Set the available tool schemas (for the help command).
    pub fn set_tool_schemas(&mut self, schemas: Vec<ToolSchema>) {
        self.tool_schemas = schemas;
    }

    /// Resolve a path argument to a workspace-absolute path, without
    /// consulting the tree. `~` maps to home; relative paths join the cwd.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if path == "~" {
            self.home.clone()
        } else if let Some(rest) = path.strip_prefix("~/") {
            self.home.join(rest)
        } else if path.starts_with('/') {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Change the current working directory, remembering the old one for
    /// `cd -`.
    pub fn set_cwd(&mut self, path: PathBuf) {
        self.prev_cwd = Some(self.cwd.clone());
        self.cwd = path;
    }

    /// Get the previous working directory (for `cd -`).
    pub fn get_prev_cwd(&self) -> Option<&PathBuf> {
        self.prev_cwd.as_ref()
    }
}

/// Appends late output to the scrollback entry a command already produced.
///
/// The two delegation builtins (`ai`, `git`) finish their logical entry
/// after the prompt has returned; everything else resolves synchronously.
/// The target entry is matched by its sequence number, so a `clear` in the
/// meantime simply drops the late block instead of landing it on a
/// different entry.
#[derive(Clone)]
pub struct LateWriter {
    scrollback: Arc<StdMutex<Vec<ScrollEntry>>>,
    seq: u64,
}

impl LateWriter {
    pub fn new(scrollback: Arc<StdMutex<Vec<ScrollEntry>>>, seq: u64) -> Self {
        Self { scrollback, seq }
    }

    /// Append a later block to the entry, marking it an error if asked.
    /// A missing entry (scrollback cleared in the meantime) is a no-op.
    pub fn append(&self, text: &str, is_error: bool) {
        let mut entries = match self.scrollback.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if let Some(entry) = entries.iter_mut().find(|e| e.seq == self.seq) {
            if !entry.output.is_empty() {
                entry.output.push('\n');
            }
            entry.output.push_str(text);
            entry.is_error = entry.is_error || is_error;
        }
    }
}
