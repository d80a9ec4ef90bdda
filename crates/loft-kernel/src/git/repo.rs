//! git2-backed collaborator.
//!
//! Wraps a real repository behind the [`GitCollaborator`] contract. The
//! repository handle lives behind a mutex because git2 objects are not
//! `Sync`; every call locks, works, and releases before returning.

use async_trait::async_trait;
use git2::{
    build::CheckoutBuilder, BranchType, IndexAddOption, Repository, Signature, StatusOptions,
    StatusShow,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use loft_types::CollaboratorError;

use super::{ChangeKind, GitCollaborator, GitResult, LogEntry, StatusEntry};

/// Collaborator over a real repository on disk.
pub struct RepoCollaborator {
    repo: Mutex<Repository>,
    root: PathBuf,
}

impl RepoCollaborator {
    /// Open an existing repository.
    pub fn open(path: impl Into<PathBuf>) -> GitResult<Self> {
        let root: PathBuf = path.into();
        let repo = Repository::open(&root).map_err(reject)?;
        Ok(Self {
            repo: Mutex::new(repo),
            root,
        })
    }

    /// Initialize a new repository.
    pub fn init(path: impl Into<PathBuf>) -> GitResult<Self> {
        let root: PathBuf = path.into();
        let repo = Repository::init(&root).map_err(reject)?;
        Ok(Self {
            repo: Mutex::new(repo),
            root,
        })
    }

    /// Root path of the repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> GitResult<std::sync::MutexGuard<'_, Repository>> {
        self.repo
            .lock()
            .map_err(|_| CollaboratorError::new("repository lock poisoned"))
    }
}

fn reject(err: git2::Error) -> CollaboratorError {
    CollaboratorError::new(err.message().to_string())
}

fn classify(status: git2::Status) -> Option<(ChangeKind, bool)> {
    if status.is_conflicted() {
        return Some((ChangeKind::Conflicted, false));
    }
    if status.is_index_new() {
        return Some((ChangeKind::New, true));
    }
    if status.is_index_modified() || status.is_index_renamed() || status.is_index_typechange() {
        return Some((ChangeKind::Modified, true));
    }
    if status.is_index_deleted() {
        return Some((ChangeKind::Deleted, true));
    }
    if status.is_wt_new() {
        return Some((ChangeKind::New, false));
    }
    if status.is_wt_modified() || status.is_wt_renamed() || status.is_wt_typechange() {
        return Some((ChangeKind::Modified, false));
    }
    if status.is_wt_deleted() {
        return Some((ChangeKind::Deleted, false));
    }
    None
}

#[async_trait]
impl GitCollaborator for RepoCollaborator {
    async fn is_repo(&self) -> bool {
        true
    }

    async fn status(&self) -> GitResult<Vec<StatusEntry>> {
        let repo = self.lock()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .show(StatusShow::IndexAndWorkdir);

        let statuses = repo.statuses(Some(&mut opts)).map_err(reject)?;
        let mut result = Vec::with_capacity(statuses.len());
        for entry in statuses.iter() {
            let path = match entry.path() {
                Some(p) => p.to_string(),
                None => continue,
            };
            if let Some((kind, staged)) = classify(entry.status()) {
                result.push(StatusEntry { path, kind, staged });
            }
        }
        Ok(result)
    }

    async fn add(&self, paths: &[String]) -> GitResult<()> {
        let repo = self.lock()?;
        let mut index = repo.index().map_err(reject)?;
        index
            .add_all(
                paths.iter().map(|s| s.as_str()),
                IndexAddOption::DEFAULT,
                None,
            )
            .map_err(reject)?;
        index.write().map_err(reject)?;
        Ok(())
    }

    async fn reset(&self, path: &str) -> GitResult<()> {
        let repo = self.lock()?;
        let head = repo.head().map_err(reject)?;
        let head_commit = head.peel_to_commit().map_err(reject)?;
        let tree = head_commit.tree().map_err(reject)?;

        repo.reset_default(Some(head_commit.as_object()), [path])
            .map_err(reject)?;

        // A path absent from HEAD is removed from the index entirely.
        if tree.get_path(Path::new(path)).is_err() {
            let mut index = repo.index().map_err(reject)?;
            let _ = index.remove_path(Path::new(path));
            index.write().map_err(reject)?;
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> GitResult<String> {
        let repo = self.lock()?;
        let mut index = repo.index().map_err(reject)?;
        let tree_oid = index.write_tree().map_err(reject)?;
        let tree = repo.find_tree(tree_oid).map_err(reject)?;

        let sig = repo
            .signature()
            .or_else(|_| Signature::now("loft", "loft@localhost"))
            .map_err(reject)?;

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(reject)?;
        Ok(oid.to_string())
    }

    async fn log(&self, depth: usize) -> GitResult<Vec<LogEntry>> {
        let repo = self.lock()?;
        if repo.head().is_err() {
            return Ok(Vec::new());
        }

        let mut revwalk = repo.revwalk().map_err(reject)?;
        revwalk.push_head().map_err(reject)?;

        let mut entries = Vec::with_capacity(depth);
        for oid in revwalk.take(depth) {
            let oid = oid.map_err(reject)?;
            let commit = repo.find_commit(oid).map_err(reject)?;
            let id = oid.to_string();
            entries.push(LogEntry {
                short_id: id[..7.min(id.len())].to_string(),
                id,
                message: commit.message().unwrap_or("").trim_end().to_string(),
                author: commit.author().name().unwrap_or("").to_string(),
                time: commit.time().seconds(),
            });
        }
        Ok(entries)
    }

    async fn branches(&self) -> GitResult<Vec<String>> {
        let repo = self.lock()?;
        let branches = repo.branches(Some(BranchType::Local)).map_err(reject)?;
        let mut result = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(reject)?;
            if let Some(name) = branch.name().map_err(reject)? {
                result.push(name.to_string());
            }
        }
        result.sort();
        Ok(result)
    }

    async fn current_branch(&self) -> GitResult<Option<String>> {
        let repo = self.lock()?;
        let result = match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(|s| s.to_string())),
            // Unborn branch or detached HEAD.
            _ => Ok(None),
        };
        result
    }

    async fn create_branch(&self, name: &str) -> GitResult<()> {
        let repo = self.lock()?;
        let head = repo.head().map_err(reject)?;
        let commit = head.peel_to_commit().map_err(reject)?;
        repo.branch(name, &commit, false).map_err(reject)?;
        Ok(())
    }

    async fn checkout(&self, target: &str) -> GitResult<()> {
        let repo = self.lock()?;
        let (object, reference) = repo.revparse_ext(target).map_err(reject)?;
        repo.checkout_tree(&object, Some(CheckoutBuilder::new().safe()))
            .map_err(reject)?;
        match reference {
            Some(reference) => {
                let name = reference
                    .name()
                    .ok_or_else(|| CollaboratorError::new("invalid reference name"))?
                    .to_string();
                repo.set_head(&name).map_err(reject)?;
            }
            None => repo.set_head_detached(object.id()).map_err(reject)?,
        }
        Ok(())
    }

    async fn push(&self) -> GitResult<()> {
        let repo = self.lock()?;
        let head = repo.head().map_err(reject)?;
        let branch = head
            .shorthand()
            .ok_or_else(|| CollaboratorError::new("detached HEAD; nothing to push"))?
            .to_string();
        let mut remote = repo.find_remote("origin").map_err(reject)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[refspec.as_str()], None).map_err(reject)?;
        Ok(())
    }

    async fn pull(&self) -> GitResult<String> {
        let repo = self.lock()?;
        let head = repo.head().map_err(reject)?;
        let branch = head
            .shorthand()
            .ok_or_else(|| CollaboratorError::new("detached HEAD; cannot pull"))?
            .to_string();

        let mut remote = repo.find_remote("origin").map_err(reject)?;
        remote
            .fetch(&[branch.as_str()], None, None)
            .map_err(reject)?;

        let fetch_head = repo.find_reference("FETCH_HEAD").map_err(reject)?;
        let fetch_commit = repo
            .reference_to_annotated_commit(&fetch_head)
            .map_err(reject)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit]).map_err(reject)?;

        if analysis.is_up_to_date() {
            return Ok("Already up to date.".to_string());
        }
        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{branch}");
            let mut reference = repo.find_reference(&refname).map_err(reject)?;
            reference
                .set_target(fetch_commit.id(), "pull: fast-forward")
                .map_err(reject)?;
            repo.set_head(&refname).map_err(reject)?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))
                .map_err(reject)?;
            let short = &fetch_commit.id().to_string()[..7];
            return Ok(format!("Fast-forwarded {branch} to {short}."));
        }
        Err(CollaboratorError::new(
            "cannot fast-forward; merge required",
        ))
    }
}
