//! loft REPL — terminal manager and interactive front-end.
//!
//! The [`TerminalManager`] owns the shell sessions: each has its own
//! working directory, history, and scrollback over one shared workspace.
//! Two sessions can be displayed simultaneously ("split"); transcripts
//! persist as JSON under the platform data directory and are restored on
//! construction.
//!
//! The interactive loop handles:
//! - Meta-commands: `/help`, `/quit`, `/new`, `/term`, `/split`, `/tabs`
//! - Command execution via the active [`ShellSession`]
//! - Prefix completion over the builtin table via rustyline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use loft_kernel::bridge::DiskBridge;
use loft_kernel::git::GitCollaborator;
use loft_kernel::tools::{register_builtins, ToolRegistry};
use loft_kernel::{ScrollEntry, ShellSession, Workspace};
use loft_types::ExecResult;

/// Persisted state of one session.
#[derive(Debug, Serialize, Deserialize)]
struct SessionState {
    name: String,
    history: Vec<String>,
    scrollback: Vec<ScrollEntry>,
}

/// Owns the shell sessions over one shared workspace.
pub struct TerminalManager {
    ws: Arc<Mutex<Workspace>>,
    registry: Arc<ToolRegistry>,
    home: PathBuf,
    git: Option<Arc<dyn GitCollaborator>>,
    sessions: Vec<ShellSession>,
    active: usize,
    split: Option<(usize, usize)>,
    next_id: usize,
    state_path: Option<PathBuf>,
}

impl TerminalManager {
    /// Create a manager with a fresh in-memory workspace and one session.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let ws = Arc::new(Mutex::new(Workspace::new(&home)));
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry);
        let registry = Arc::new(registry);

        let mut manager = Self {
            ws,
            registry,
            home,
            git: None,
            sessions: Vec::new(),
            active: 0,
            split: None,
            next_id: 1,
            state_path: None,
        };
        manager.new_session();
        manager
    }

    /// Persist transcripts under `path` and restore anything saved there.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self.restore_state();
        self
    }

    /// Bind a disk bridge to the shared workspace.
    pub async fn bind_bridge(&self, bridge: Arc<dyn DiskBridge>) -> Result<()> {
        self.ws
            .lock()
            .await
            .bind(bridge)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    /// Attach a git collaborator to every session, current and future.
    pub fn set_git(&mut self, git: Arc<dyn GitCollaborator>) {
        for session in &mut self.sessions {
            session.set_git(git.clone());
        }
        self.git = Some(git);
    }

    /// The shared workspace handle.
    pub fn workspace(&self) -> Arc<Mutex<Workspace>> {
        self.ws.clone()
    }

    /// Create a new session, make it active, and return its index.
    pub fn new_session(&mut self) -> usize {
        let name = format!("term-{}", self.next_id);
        self.next_id += 1;
        let mut session = ShellSession::new(
            name,
            self.ws.clone(),
            self.registry.clone(),
            &self.home,
        );
        if let Some(git) = &self.git {
            session.set_git(git.clone());
        }
        self.sessions.push(session);
        self.active = self.sessions.len() - 1;
        self.active
    }

    pub fn sessions(&self) -> &[ShellSession] {
        &self.sessions
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Switch the active session.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.sessions.len() {
            anyhow::bail!("no such terminal: {}", index + 1);
        }
        self.active = index;
        Ok(())
    }

    pub fn active_session(&mut self) -> &mut ShellSession {
        &mut self.sessions[self.active]
    }

    /// Display two sessions side by side.
    pub fn split(&mut self, left: usize, right: usize) -> Result<()> {
        if left >= self.sessions.len() || right >= self.sessions.len() || left == right {
            anyhow::bail!("split needs two distinct existing terminals");
        }
        self.split = Some((left, right));
        Ok(())
    }

    pub fn unsplit(&mut self) {
        self.split = None;
    }

    /// Indices of the sessions currently displayed: the split pair, or
    /// just the active one.
    pub fn visible(&self) -> Vec<usize> {
        match self.split {
            Some((left, right)) => vec![left, right],
            None => vec![self.active],
        }
    }

    /// Run one input line on the active session.
    pub async fn run_line(&mut self, line: &str) -> ExecResult {
        let result = self.sessions[self.active].run_line(line).await;
        self.save_state();
        result
    }

    /// Current tab labels, re-read through ids.
    pub async fn tab_labels(&self) -> Vec<String> {
        self.ws
            .lock()
            .await
            .tab_labels()
            .into_iter()
            .map(|(_, name)| name)
            .collect()
    }

    fn save_state(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        let states: Vec<SessionState> = self
            .sessions
            .iter()
            .map(|s| SessionState {
                name: s.name().to_string(),
                history: s.history(),
                scrollback: s.scrollback(),
            })
            .collect();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create state directory: {}", e);
                return;
            }
        }
        match serde_json::to_vec_pretty(&states) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(path, bytes) {
                    tracing::warn!("failed to save transcripts: {}", e);
                }
            }
            Err(e) => tracing::warn!("failed to encode transcripts: {}", e),
        }
    }

    fn restore_state(&mut self) {
        let Some(path) = &self.state_path else {
            return;
        };
        let Ok(bytes) = std::fs::read(path) else {
            return;
        };
        let Ok(states) = serde_json::from_slice::<Vec<SessionState>>(&bytes) else {
            tracing::warn!("ignoring unreadable transcript file");
            return;
        };
        self.sessions.clear();
        self.next_id = 1;
        for state in states {
            let index = self.new_session();
            self.sessions[index].restore(state.history, state.scrollback);
        }
        if self.sessions.is_empty() {
            self.new_session();
        }
        self.active = 0;
    }
}

/// Prefix completion over the builtin table.
///
/// Completing the first token offers `"<command> "` so focus stays on the
/// arguments; past the first token there is nothing to offer.
pub struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        if head.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|c| c.starts_with(head))
            .map(|c| Pair {
                display: c.clone(),
                replacement: format!("{} ", c),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}
impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Result from meta-command handling.
enum MetaResult {
    Continue(Option<String>),
    Exit,
}

/// REPL state: the manager plus the runtime driving it.
pub struct Repl {
    manager: TerminalManager,
    runtime: Runtime,
}

/// Transcript file under the platform data directory.
fn default_state_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("loft").join("sessions.json"))
}

impl Repl {
    /// Create a REPL with an in-memory workspace homed at `/home/guest`.
    /// Transcripts persist under the platform data directory.
    pub fn new() -> Result<Self> {
        let mut manager = TerminalManager::new("/home/guest");
        if let Some(path) = default_state_path() {
            manager = manager.with_state_path(path);
        }
        let runtime = Runtime::new().context("failed to create tokio runtime")?;
        Ok(Self { manager, runtime })
    }

    /// Create a REPL whose workspace writes through to a real directory.
    pub fn with_mount(root: &Path) -> Result<Self> {
        let manager = TerminalManager::new("/");
        let runtime = Runtime::new().context("failed to create tokio runtime")?;
        let bridge = Arc::new(loft_kernel::bridge::LocalBridge::new(root));
        runtime
            .block_on(manager.bind_bridge(bridge))
            .context("failed to bind disk bridge")?;

        let mut repl = Self { manager, runtime };
        if let Ok(collab) = loft_kernel::git::RepoCollaborator::open(root) {
            repl.manager.set_git(Arc::new(collab));
        }
        Ok(repl)
    }

    pub fn manager_mut(&mut self) -> &mut TerminalManager {
        &mut self.manager
    }

    /// Process one input line. `Ok(None)` means nothing to display.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.starts_with('/') {
            return match self.handle_meta_command(trimmed) {
                MetaResult::Continue(output) => Ok(output),
                MetaResult::Exit => Err(anyhow::anyhow!("__REPL_EXIT__")),
            };
        }

        let result = self.runtime.block_on(self.manager.run_line(trimmed));
        let text = result.display_text();
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(text.to_string()))
        }
    }

    fn handle_meta_command(&mut self, cmd: &str) -> MetaResult {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        match parts.first().copied().unwrap_or("") {
            "/quit" | "/q" | "/exit" => MetaResult::Exit,
            "/help" | "/?" => MetaResult::Continue(Some(HELP_TEXT.to_string())),
            "/new" => {
                let index = self.manager.new_session();
                MetaResult::Continue(Some(format!("switched to term-{}", index + 1)))
            }
            "/term" => match parts.get(1).and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n >= 1 => match self.manager.set_active(n - 1) {
                    Ok(()) => MetaResult::Continue(Some(format!("switched to term-{}", n))),
                    Err(e) => MetaResult::Continue(Some(e.to_string())),
                },
                _ => MetaResult::Continue(Some("usage: /term <number>".to_string())),
            },
            "/split" => {
                let left = parts.get(1).and_then(|n| n.parse::<usize>().ok());
                let right = parts.get(2).and_then(|n| n.parse::<usize>().ok());
                match (left, right) {
                    (Some(l), Some(r)) if l >= 1 && r >= 1 => {
                        match self.manager.split(l - 1, r - 1) {
                            Ok(()) => MetaResult::Continue(Some(format!(
                                "split: term-{} | term-{}",
                                l, r
                            ))),
                            Err(e) => MetaResult::Continue(Some(e.to_string())),
                        }
                    }
                    _ => {
                        self.manager.unsplit();
                        MetaResult::Continue(Some("split cleared".to_string()))
                    }
                }
            }
            "/tabs" => {
                let labels = self.runtime.block_on(self.manager.tab_labels());
                if labels.is_empty() {
                    MetaResult::Continue(Some("(no open tabs)".to_string()))
                } else {
                    MetaResult::Continue(Some(labels.join("  ")))
                }
            }
            other => MetaResult::Continue(Some(format!(
                "Unknown command: {}\nType /help for available commands.",
                other
            ))),
        }
    }

    fn prompt(&mut self) -> String {
        let cwd = self.manager.active_session().cwd().display().to_string();
        let term = self.manager.active_index() + 1;
        format!("loft:{} [{}]> ", cwd, term)
    }
}

const HELP_TEXT: &str = r#"loft — workspace shell

Meta commands:
  /help, /?         Show this help
  /quit, /q         Exit
  /new              Open a new terminal session
  /term <n>         Switch to terminal n
  /split <a> <b>    Show terminals a and b together (no args: clear)
  /tabs             Show open editor tabs

Everything else is a shell command; try `help` for the builtin list.
"#;

/// Save rustyline history to disk.
fn save_history(rl: &mut Editor<CommandCompleter, DefaultHistory>, path: &Option<PathBuf>) {
    if let Some(path) = path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create history directory: {}", e);
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("failed to save history: {}", e);
        }
    }
}

/// Run the interactive REPL.
pub fn run(mut repl: Repl) -> Result<()> {
    println!("loft v{}", env!("CARGO_PKG_VERSION"));
    println!("Type /help for commands, /quit to exit.");
    println!();

    let completer = CommandCompleter::new(
        repl.manager_mut()
            .active_session()
            .tool_schemas()
            .iter()
            .map(|s| s.name.clone())
            .collect(),
    );
    let mut rl: Editor<CommandCompleter, DefaultHistory> =
        Editor::new().context("failed to create editor")?;
    rl.set_helper(Some(completer));

    let history_path = directories::BaseDirs::new()
        .map(|b| b.data_dir().join("loft").join("history.txt"));
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(&repl.prompt()) {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::warn!("failed to add history entry: {}", e);
                }
                match repl.process_line(&line) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) if e.to_string() == "__REPL_EXIT__" => {
                        save_history(&mut rl, &history_path);
                        return Ok(());
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manager_routes_to_active_session() {
        let mut manager = TerminalManager::new("/home/guest");
        manager.run_line("mkdir /a").await;
        manager.run_line("cd /a").await;
        assert_eq!(
            manager.active_session().cwd(),
            std::path::Path::new("/a")
        );

        // A second session starts at home, unaffected.
        manager.new_session();
        assert_eq!(
            manager.active_session().cwd(),
            std::path::Path::new("/home/guest")
        );
    }

    #[tokio::test]
    async fn split_shows_two_sessions() {
        let mut manager = TerminalManager::new("/");
        manager.new_session();
        assert_eq!(manager.visible().len(), 1);

        manager.split(0, 1).unwrap();
        assert_eq!(manager.visible(), vec![0, 1]);

        manager.unsplit();
        assert_eq!(manager.visible().len(), 1);

        assert!(manager.split(0, 0).is_err());
        assert!(manager.split(0, 9).is_err());
    }

    #[tokio::test]
    async fn transcripts_persist_and_restore() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");

        {
            let mut manager =
                TerminalManager::new("/home/guest").with_state_path(&path);
            manager.run_line("echo hello").await;
            manager.run_line("pwd").await;
        }

        let manager = TerminalManager::new("/home/guest").with_state_path(&path);
        let session = &manager.sessions()[0];
        assert_eq!(session.history(), vec!["echo hello", "pwd"]);
        let scrollback = session.scrollback();
        assert_eq!(scrollback.len(), 2);
        assert_eq!(scrollback[0].output, "hello");
    }

    #[test]
    fn completer_offers_prefix_matches_with_trailing_space() {
        let completer = CommandCompleter::new(vec![
            "cat".into(),
            "cd".into(),
            "ls".into(),
        ]);
        let history = DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, candidates) = completer.complete("c", 1, &ctx).unwrap();
        assert_eq!(start, 0);
        let replacements: Vec<&str> =
            candidates.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(replacements, vec!["cat ", "cd "]);

        // Past the first token: nothing to offer.
        let (_, candidates) = completer.complete("cat fi", 6, &ctx).unwrap();
        assert!(candidates.is_empty());
    }
}
