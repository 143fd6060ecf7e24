// src/history.rs

//! Fallback attribution for files that blame reports no lines for.
//!
//! Reads the header of the newest entry of `git log --format=fuller`:
//!
//! ```text
//! commit 4f2a...
//! Author:     Alice <alice@example.com>
//! AuthorDate: ...
//! Commit:     Bob <bob@example.com>
//! CommitDate: ...
//! ```

use crate::model::{CommitHash, FileBlameResult, Identity, IdentityMode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history is empty")]
    Empty,
    #[error("expected 'commit <hash>', found '{0}'")]
    MissingCommit(String),
    #[error("commit {hash} has no '{field}' line")]
    MissingIdentity { hash: CommitHash, field: &'static str },
}

/// The single commit and identity a lineless file is credited to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRecord {
    pub commit: CommitHash,
    pub identity: Identity,
}

impl CreationRecord {
    /// Touches the file without contributing lines.
    pub fn into_file_result(self) -> FileBlameResult {
        let mut result = FileBlameResult::default();
        result.record(&self.identity, &self.commit, 0);
        result
    }
}

fn identity_field(mode: IdentityMode) -> &'static str {
    match mode {
        IdentityMode::Author => "Author",
        IdentityMode::Committer => "Commit",
    }
}

/// `Alice Smith <alice@example.com>` -> `Alice Smith`
fn strip_email(value: &str) -> &str {
    let value = value.trim();
    match value.rfind(" <") {
        Some(pos) if value.ends_with('>') => value[..pos].trim_end(),
        _ => value,
    }
}

pub fn resolve_creation(stream: &str, mode: IdentityMode) -> Result<CreationRecord, HistoryError> {
    let mut lines = stream.lines().skip_while(|l| l.trim().is_empty());
    let first = lines.next().ok_or(HistoryError::Empty)?;
    let hash = match first.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["commit", hash, ..] => hash.to_string(),
        _ => return Err(HistoryError::MissingCommit(first.to_string())),
    };

    let field = identity_field(mode);
    // headers of the first entry end at the blank line before the message
    let identity = lines
        .take_while(|l| !l.trim().is_empty())
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key == field).then(|| strip_email(value).to_string())
        })
        .ok_or(HistoryError::MissingIdentity {
            hash: hash.clone(),
            field,
        })?;

    Ok(CreationRecord {
        commit: hash,
        identity,
    })
}
