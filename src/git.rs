// src/git.rs

use crate::error::{Error, Result};
use crate::pipeline::HistorySource;
use git2::{ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Every blob path of the tree at `revision`, in tree order.
pub fn list_files(repo_path: &Path, revision: &str) -> Result<Vec<String>> {
    let repo = Repository::open(repo_path)?;
    let tree = repo.revparse_single(revision)?.peel_to_tree()?;
    debug!(revision, tree = %tree.id(), "listing files");

    let mut files = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                files.push(format!("{}{}", dir, name));
            }
        }
        TreeWalkResult::Ok
    })?;
    Ok(files)
}

/// Fetches streams by running the `git` binary inside the repository.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
    revision: String,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        GitCli {
            repo: repo.into(),
            revision: revision.into(),
        }
    }

    fn run(&self, path: &str, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .arg(&self.revision)
            .arg("--")
            .arg(path)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| Error::fetch(path, format!("cannot run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::fetch(
                path,
                format!("git {} exited with {}: {}", args[0], output.status, stderr.trim()),
            ));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| Error::fetch(path, format!("git {} output is not UTF-8", args[0])))
    }
}

impl HistorySource for GitCli {
    fn blame(&self, path: &str) -> Result<String> {
        self.run(path, &["blame", "--incremental"])
    }

    fn creation_log(&self, path: &str) -> Result<String> {
        self.run(path, &["log", "--format=fuller"])
    }
}
