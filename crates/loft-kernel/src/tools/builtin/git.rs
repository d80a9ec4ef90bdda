//! git — Version control via the external collaborator.
//!
//! A thin formatter over the [`GitCollaborator`] contract. Every rejection
//! surfaces verbatim prefixed `fatal:`; the subcommands run detached and
//! append their result to the command's scrollback entry on completion, so
//! the interpreter can accept the next line meanwhile.

use async_trait::async_trait;
use std::sync::Arc;

use loft_types::ExecResult;

use crate::git::{GitCollaborator, StatusEntry};
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Git tool: formatter over the collaborator contract.
pub struct Git;

#[async_trait]
impl Tool for Git {
    fn name(&self) -> &str {
        "git"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("git", "Version control operations")
            .param(ParamSchema::required(
                "subcommand",
                "string",
                "Subcommand (status, add, reset, commit, log, branch, checkout, push, pull)",
            ))
            .param(
                ParamSchema::optional("message", "string", "Commit message (-m)")
                    .with_aliases(["-m"]),
            )
            .param(
                ParamSchema::optional("count", "int", "Number of log entries (-n)")
                    .with_aliases(["-n"]),
            )
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let collab = match ctx.git.clone() {
            Some(g) => g,
            None => return ExecResult::failure(128, "fatal: not a git repository"),
        };
        if args.positional.is_empty() {
            return ExecResult::failure(1, "git: missing subcommand");
        }

        // Subcommands complete asynchronously: the result lands on this
        // command's scrollback entry when the collaborator answers.
        match ctx.late.clone() {
            Some(writer) => {
                tokio::spawn(async move {
                    let result = run_subcommand(collab, args).await;
                    writer.append(result.display_text(), !result.ok());
                });
                ExecResult::success("")
            }
            None => run_subcommand(collab, args).await,
        }
    }
}

async fn run_subcommand(collab: Arc<dyn GitCollaborator>, args: ToolArgs) -> ExecResult {
    if !collab.is_repo().await {
        return ExecResult::failure(128, "fatal: not a git repository");
    }
    let sub = args.positional[0].as_str();
    let rest: Vec<String> = args.positional[1..].to_vec();

    match sub {
        "status" => git_status(&collab).await,
        "add" => git_add(&collab, &rest).await,
        "reset" => git_reset(&collab, &rest).await,
        "commit" => git_commit(&collab, &args, &rest).await,
        "log" => git_log(&collab, &args).await,
        "branch" => git_branch(&collab, &rest).await,
        "checkout" => git_checkout(&collab, &rest).await,
        "push" => match collab.push().await {
            Ok(()) => ExecResult::success("Pushed to origin."),
            Err(e) => fatal(e),
        },
        "pull" => match collab.pull().await {
            Ok(summary) => ExecResult::success(summary),
            Err(e) => fatal(e),
        },
        _ => ExecResult::failure(1, format!("git: unknown subcommand '{}'", sub)),
    }
}

fn fatal(err: loft_types::CollaboratorError) -> ExecResult {
    ExecResult::failure(128, format!("fatal: {}", err))
}

async fn git_status(collab: &Arc<dyn GitCollaborator>) -> ExecResult {
    let statuses = match collab.status().await {
        Ok(s) => s,
        Err(e) => return fatal(e),
    };
    let branch = collab.current_branch().await.ok().flatten();

    let mut out = String::new();
    if let Some(branch) = branch {
        out.push_str(&format!("On branch {}\n", branch));
    }
    if statuses.is_empty() {
        out.push_str("nothing to commit, working tree clean");
        return ExecResult::success(out);
    }

    let staged: Vec<&StatusEntry> = statuses.iter().filter(|s| s.staged).collect();
    let unstaged: Vec<&StatusEntry> = statuses.iter().filter(|s| !s.staged).collect();

    if !staged.is_empty() {
        out.push_str("\nChanges to be committed:\n");
        for entry in staged {
            out.push_str(&format!("  {} {}\n", entry.kind.code(), entry.path));
        }
    }
    if !unstaged.is_empty() {
        out.push_str("\nChanges not staged for commit:\n");
        for entry in unstaged {
            out.push_str(&format!("  {} {}\n", entry.kind.code(), entry.path));
        }
    }
    ExecResult::success(out.trim_end().to_string())
}

async fn git_add(collab: &Arc<dyn GitCollaborator>, paths: &[String]) -> ExecResult {
    if paths.is_empty() {
        return ExecResult::failure(1, "git add: missing pathspec");
    }
    match collab.add(paths).await {
        Ok(()) => ExecResult::success(""),
        Err(e) => fatal(e),
    }
}

async fn git_reset(collab: &Arc<dyn GitCollaborator>, paths: &[String]) -> ExecResult {
    let path = match paths.first() {
        Some(p) => p,
        None => return ExecResult::failure(1, "git reset: missing path"),
    };
    match collab.reset(path).await {
        Ok(()) => ExecResult::success(format!("Unstaged changes after reset of '{}'", path)),
        Err(e) => fatal(e),
    }
}

async fn git_commit(
    collab: &Arc<dyn GitCollaborator>,
    args: &ToolArgs,
    rest: &[String],
) -> ExecResult {
    // The flat tokenizer has no quoting, so the message is the -m value
    // plus any trailing words.
    let mut message = match args.get_string("message", usize::MAX) {
        Some(m) => m,
        None => return ExecResult::failure(1, "git commit: missing message (-m)"),
    };
    if !rest.is_empty() {
        message.push(' ');
        message.push_str(&rest.join(" "));
    }

    match collab.commit(&message).await {
        Ok(id) => {
            let branch = collab
                .current_branch()
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| "HEAD".to_string());
            let short = &id[..7.min(id.len())];
            ExecResult::success(format!("[{} {}] {}", branch, short, message))
        }
        Err(e) => fatal(e),
    }
}

async fn git_log(collab: &Arc<dyn GitCollaborator>, args: &ToolArgs) -> ExecResult {
    let depth = args.get_usize("count").unwrap_or(5);
    match collab.log(depth).await {
        Ok(entries) if entries.is_empty() => {
            ExecResult::success("(no commits yet)")
        }
        Ok(entries) => {
            let lines: Vec<String> = entries
                .iter()
                .map(|e| {
                    let first_line = e.message.lines().next().unwrap_or("");
                    format!("{} {}", e.short_id, first_line)
                })
                .collect();
            ExecResult::success(lines.join("\n"))
        }
        Err(e) => fatal(e),
    }
}

async fn git_branch(collab: &Arc<dyn GitCollaborator>, rest: &[String]) -> ExecResult {
    match rest.first() {
        // `git branch <name>` creates.
        Some(name) => match collab.create_branch(name).await {
            Ok(()) => ExecResult::success(""),
            Err(e) => fatal(e),
        },
        // `git branch` lists, marking the current one.
        None => {
            let branches = match collab.branches().await {
                Ok(b) => b,
                Err(e) => return fatal(e),
            };
            let current = collab.current_branch().await.ok().flatten();
            let lines: Vec<String> = branches
                .iter()
                .map(|b| {
                    if Some(b) == current.as_ref() {
                        format!("* {}", b)
                    } else {
                        format!("  {}", b)
                    }
                })
                .collect();
            ExecResult::success(lines.join("\n"))
        }
    }
}

async fn git_checkout(collab: &Arc<dyn GitCollaborator>, rest: &[String]) -> ExecResult {
    let target = match rest.first() {
        Some(t) => t,
        None => return ExecResult::failure(1, "git checkout: missing ref"),
    };
    match collab.checkout(target).await {
        Ok(()) => ExecResult::success(format!("Switched to '{}'", target)),
        Err(e) => fatal(e),
    }
}
