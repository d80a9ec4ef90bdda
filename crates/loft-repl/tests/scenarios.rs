//! End-to-end scenarios for the workspace shell.
//!
//! Each test drives a full stack: terminal manager → shell session →
//! builtin → workspace (and, where relevant, a disk bridge).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use loft_kernel::bridge::{BridgeEntry, DiskBridge, LocalBridge};
use loft_kernel::tools::{register_builtins, ToolRegistry};
use loft_kernel::{ShellSession, Workspace};
use loft_types::BridgeError;

fn session_over(ws: Arc<Mutex<Workspace>>, home: &str) -> ShellSession {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);
    ShellSession::new("term-1", ws, Arc::new(registry), home)
}

fn memory_session() -> ShellSession {
    session_over(Arc::new(Mutex::new(Workspace::new("/home/guest"))), "/home/guest")
}

#[tokio::test]
async fn scenario_create_and_list_with_sizes() {
    // mkdir /a; touch /a/b.txt = "hi"; ls -l /a shows b.txt with size 2.
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");

    assert!(shell.run_line("mkdir /a").await.ok());
    assert!(shell.run_line("touch /a/b.txt").await.ok());
    {
        let mut ws = ws.lock().await;
        let id = ws.resolve_path("/a/b.txt", Path::new("/")).unwrap();
        ws.set_content(id, "hi").await.unwrap();
    }

    let result = shell.run_line("ls -l /a").await;
    assert!(result.ok());
    let line = result.out.lines().find(|l| l.contains("b.txt")).unwrap();
    assert!(line.contains(" 2 "), "expected size 2 in: {}", line);
}

#[tokio::test]
async fn scenario_cd_dotdot_pwd() {
    let mut shell = memory_session();
    shell.run_line("mkdir /a").await;

    assert!(shell.run_line("cd /a").await.ok());
    assert!(shell.run_line("cd ..").await.ok());
    let result = shell.run_line("pwd").await;
    assert_eq!(result.out, "/");
}

#[tokio::test]
async fn scenario_rm_non_empty_without_flag_is_refused() {
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");

    shell.run_line("mkdir /a").await;
    shell.run_line("touch /a/b.txt").await;

    let result = shell.run_line("rm /a").await;
    assert!(!result.ok());
    assert!(result.err.contains("not empty"));

    // Tree unchanged.
    let ws = ws.lock().await;
    assert!(ws.resolve_path("/a", Path::new("/")).is_some());
    assert!(ws.resolve_path("/a/b.txt", Path::new("/")).is_some());
    ws.tree().check_invariants().unwrap();
}

#[tokio::test]
async fn scenario_move_under_own_descendant_is_invalid() {
    let mut shell = memory_session();
    shell.run_line("mkdir /x").await;
    shell.run_line("mkdir /x/y").await;

    let result = shell.run_line("mv /x /x/y").await;
    assert!(!result.ok());
    assert!(result.err.contains("invalid move"));
}

#[tokio::test]
async fn scenario_tab_label_follows_rename_with_no_extra_call() {
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");

    shell.run_line("touch /old.txt").await;
    {
        let mut ws = ws.lock().await;
        let id = ws.resolve_path("/old.txt", Path::new("/")).unwrap();
        ws.open_tab(id).unwrap();
        assert_eq!(ws.tab_labels()[0].1, "old.txt");
    }

    assert!(shell.run_line("mv /old.txt /new.txt").await.ok());

    // The tab bar re-reads through the id; no refresh call happened.
    let ws = ws.lock().await;
    assert_eq!(ws.tab_labels()[0].1, "new.txt");
}

#[tokio::test]
async fn scenario_cat_grep_head_pipelineless_flow() {
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");

    shell.run_line("touch /log.txt").await;
    {
        let mut ws = ws.lock().await;
        let id = ws.resolve_path("/log.txt", Path::new("/")).unwrap();
        let lines: Vec<String> = (1..=20).map(|i| format!("entry {}", i)).collect();
        ws.set_content(id, &lines.join("\n")).await.unwrap();
    }

    let result = shell.run_line("grep entry /log.txt").await;
    assert_eq!(result.out.lines().count(), 20);

    let result = shell.run_line("head -n 3 /log.txt").await;
    assert_eq!(result.out.lines().count(), 3);

    let result = shell.run_line("tail -n 2 /log.txt").await;
    assert_eq!(result.out, "entry 19\nentry 20");

    let result = shell.run_line("wc -l /log.txt").await;
    assert!(result.out.trim_start().starts_with("20"));
}

/// Bridge double that refuses every mutation.
struct FailingBridge;

#[async_trait]
impl DiskBridge for FailingBridge {
    async fn list_tree(&self) -> Result<Vec<BridgeEntry>, BridgeError> {
        Ok(Vec::new())
    }
    async fn create_file(&self, _: &Path, _: &str, _: &str) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
    async fn create_dir(&self, _: &Path, _: &str) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
    async fn remove(&self, _: &Path) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
    async fn rename(&self, _: &Path, _: &Path) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
    async fn relocate(&self, _: &Path, _: &Path) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
    async fn write_file(&self, _: &Path, _: &str) -> Result<(), BridgeError> {
        Err(BridgeError::failure("bridge: write refused"))
    }
}

#[tokio::test]
async fn scenario_bridge_failure_leaves_tree_identical_and_surfaces_error() {
    let mut ws = Workspace::new("/");
    ws.bind(Arc::new(FailingBridge)).await.unwrap();
    let ws = Arc::new(Mutex::new(ws));
    let mut shell = session_over(ws.clone(), "/");

    let before = {
        let ws = ws.lock().await;
        ws.tree().len()
    };

    let result = shell.run_line("touch newfile").await;
    assert!(!result.ok());
    assert!(result.err.contains("bridge: write refused"));

    let ws = ws.lock().await;
    assert_eq!(ws.tree().len(), before);
    assert!(ws.resolve_path("/newfile", Path::new("/")).is_none());
}

#[tokio::test]
async fn scenario_disk_backed_shell_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("seed.txt"), "seeded").unwrap();

    let mut ws = Workspace::new("/");
    ws.bind(Arc::new(LocalBridge::new(dir.path()))).await.unwrap();
    let ws = Arc::new(Mutex::new(ws));
    let mut shell = session_over(ws.clone(), "/");

    // The seed file arrived via the bind-time enumeration.
    let result = shell.run_line("cat /seed.txt").await;
    assert_eq!(result.out, "seeded");

    // Mutations write through to disk.
    assert!(shell.run_line("mkdir /src").await.ok());
    assert!(shell.run_line("touch /src/main.rs").await.ok());
    assert!(dir.path().join("src/main.rs").exists());

    assert!(shell.run_line("mv /src/main.rs /src/lib.rs").await.ok());
    assert!(dir.path().join("src/lib.rs").exists());
    assert!(!dir.path().join("src/main.rs").exists());

    assert!(shell.run_line("rm -r /src").await.ok());
    assert!(!dir.path().join("src").exists());

    let ws = ws.lock().await;
    ws.tree().check_invariants().unwrap();
}

#[tokio::test]
async fn scenario_set_content_round_trip_updates_tabs_view() {
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");
    shell.run_line("touch /draft.txt").await;

    let id = {
        let mut ws = ws.lock().await;
        let id = ws.resolve_path("/draft.txt", Path::new("/")).unwrap();
        ws.open_tab(id).unwrap();
        ws.set_content(id, "第一稿 v2").await.unwrap();
        id
    };

    let ws = ws.lock().await;
    let node = ws.tree().node(id).unwrap();
    assert_eq!(node.content(), "第一稿 v2");
    assert_eq!(node.size, "第一稿 v2".len() as u64);
    assert_eq!(ws.active_tab(), Some(id));
}

#[tokio::test]
async fn scenario_delete_active_tab_promotes_neighbor() {
    let ws = Arc::new(Mutex::new(Workspace::new("/home/guest")));
    let mut shell = session_over(ws.clone(), "/home/guest");
    shell.run_line("touch /a.txt").await;
    shell.run_line("touch /b.txt").await;
    shell.run_line("touch /c.txt").await;

    let (a, b, c) = {
        let mut ws = ws.lock().await;
        let a = ws.resolve_path("/a.txt", Path::new("/")).unwrap();
        let b = ws.resolve_path("/b.txt", Path::new("/")).unwrap();
        let c = ws.resolve_path("/c.txt", Path::new("/")).unwrap();
        ws.open_tab(a).unwrap();
        ws.open_tab(b).unwrap();
        ws.open_tab(c).unwrap();
        ws.open_tab(b).unwrap(); // b active, in the middle
        (a, b, c)
    };

    assert!(shell.run_line("rm /b.txt").await.ok());

    let ws = ws.lock().await;
    assert_eq!(ws.open_tabs(), &[a, c]);
    // Same index in the shrunk list.
    assert_eq!(ws.active_tab(), Some(c));
    let _ = b;
}
