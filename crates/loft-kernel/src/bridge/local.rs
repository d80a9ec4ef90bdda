//! Local filesystem bridge.
//!
//! Mirrors workspace mutations onto a real directory. All operations are
//! relative to `root`; paths that escape the root via `..` are refused.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use loft_types::{BridgeError, NodeKind};

use super::{BridgeEntry, DiskBridge};

/// Disk bridge rooted at a real directory.
#[derive(Debug, Clone)]
pub struct LocalBridge {
    root: PathBuf,
}

impl LocalBridge {
    /// Create a bridge rooted at the given path. The path must exist and be
    /// a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a workspace-absolute path to a real path within the root.
    ///
    /// Returns an error if the path escapes the root.
    fn resolve(&self, path: &Path) -> Result<PathBuf, BridgeError> {
        let relative = path.strip_prefix("/").unwrap_or(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                std::path::Component::Normal(seg) => resolved.push(seg),
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    if resolved == self.root || !resolved.pop() {
                        return Err(BridgeError::failure(format!(
                            "path escapes root: {}",
                            path.display()
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(resolved)
    }
}

fn io_err(op: &str, path: &Path, err: io::Error) -> BridgeError {
    BridgeError::failure(format!("{}: {}: {}", op, path.display(), err))
}

#[async_trait]
impl DiskBridge for LocalBridge {
    async fn list_tree(&self) -> Result<Vec<BridgeEntry>, BridgeError> {
        let mut entries = Vec::new();
        let mut pending = vec![PathBuf::new()];

        while let Some(rel) = pending.pop() {
            let full = self.root.join(&rel);
            let mut dir = fs::read_dir(&full)
                .await
                .map_err(|e| io_err("list", &full, e))?;

            while let Some(entry) = dir.next_entry().await.map_err(|e| io_err("list", &full, e))? {
                let name = entry.file_name();
                let child_rel = rel.join(&name);
                let meta = entry
                    .metadata()
                    .await
                    .map_err(|e| io_err("stat", &child_rel, e))?;

                if meta.is_dir() {
                    entries.push(BridgeEntry {
                        path: child_rel.clone(),
                        kind: NodeKind::Directory,
                        content: String::new(),
                        modified: meta.modified().ok(),
                    });
                    pending.push(child_rel);
                } else {
                    let bytes = fs::read(entry.path())
                        .await
                        .map_err(|e| io_err("read", &child_rel, e))?;
                    entries.push(BridgeEntry {
                        path: child_rel,
                        kind: NodeKind::File,
                        content: String::from_utf8_lossy(&bytes).into_owned(),
                        modified: meta.modified().ok(),
                    });
                }
            }
        }

        Ok(entries)
    }

    async fn create_file(
        &self,
        parent: &Path,
        name: &str,
        content: &str,
    ) -> Result<(), BridgeError> {
        let full = self.resolve(&parent.join(name))?;
        if fs::try_exists(&full).await.unwrap_or(false) {
            return Err(BridgeError::failure(format!(
                "already exists: {}",
                full.display()
            )));
        }
        fs::write(&full, content)
            .await
            .map_err(|e| io_err("create", &full, e))
    }

    async fn create_dir(&self, parent: &Path, name: &str) -> Result<(), BridgeError> {
        let full = self.resolve(&parent.join(name))?;
        fs::create_dir(&full)
            .await
            .map_err(|e| io_err("mkdir", &full, e))
    }

    async fn remove(&self, path: &Path) -> Result<(), BridgeError> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| io_err("remove", &full, e))?;
        if meta.is_dir() {
            fs::remove_dir_all(&full)
                .await
                .map_err(|e| io_err("remove", &full, e))
        } else {
            fs::remove_file(&full)
                .await
                .map_err(|e| io_err("remove", &full, e))
        }
    }

    async fn rename(&self, old: &Path, new: &Path) -> Result<(), BridgeError> {
        let from = self.resolve(old)?;
        let to = self.resolve(new)?;
        fs::rename(&from, &to)
            .await
            .map_err(|e| io_err("rename", &from, e))
    }

    async fn relocate(&self, old: &Path, new: &Path) -> Result<(), BridgeError> {
        self.rename(old, new).await
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), BridgeError> {
        let full = self.resolve(path)?;
        fs::write(&full, content)
            .await
            .map_err(|e| io_err("write", &full, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (LocalBridge, TempDir) {
        let dir = TempDir::new().unwrap();
        (LocalBridge::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn create_and_list() {
        let (bridge, _dir) = setup().await;
        bridge.create_dir(Path::new("/"), "src").await.unwrap();
        bridge
            .create_file(Path::new("/src"), "main.rs", "fn main() {}")
            .await
            .unwrap();

        let entries = bridge.list_tree().await.unwrap();
        assert_eq!(entries.len(), 2);
        let file = entries
            .iter()
            .find(|e| e.path == Path::new("src/main.rs"))
            .unwrap();
        assert_eq!(file.kind, NodeKind::File);
        assert_eq!(file.content, "fn main() {}");
    }

    #[tokio::test]
    async fn create_file_rejects_existing() {
        let (bridge, _dir) = setup().await;
        bridge
            .create_file(Path::new("/"), "a.txt", "one")
            .await
            .unwrap();
        let err = bridge
            .create_file(Path::new("/"), "a.txt", "two")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn remove_file_and_tree() {
        let (bridge, _dir) = setup().await;
        bridge.create_dir(Path::new("/"), "d").await.unwrap();
        bridge
            .create_file(Path::new("/d"), "f.txt", "data")
            .await
            .unwrap();

        bridge.remove(Path::new("/d")).await.unwrap();
        assert!(bridge.list_tree().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_moves_entry() {
        let (bridge, _dir) = setup().await;
        bridge
            .create_file(Path::new("/"), "old.txt", "data")
            .await
            .unwrap();
        bridge
            .rename(Path::new("/old.txt"), Path::new("/new.txt"))
            .await
            .unwrap();

        let entries = bridge.list_tree().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, Path::new("new.txt"));
    }

    #[tokio::test]
    async fn path_escape_is_refused() {
        let (bridge, _dir) = setup().await;
        let err = bridge.remove(Path::new("/../../etc/passwd")).await.unwrap_err();
        assert!(err.to_string().contains("escapes root"));
    }

    #[tokio::test]
    async fn remove_missing_fails() {
        let (bridge, _dir) = setup().await;
        assert!(bridge.remove(Path::new("/nope.txt")).await.is_err());
    }
}
