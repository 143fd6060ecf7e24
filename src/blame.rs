// src/blame.rs

//! Decoder for the `git blame --incremental` stream of a single file.
//!
//! Each record opens with `<hash> <original-line> <final-line> <line-count>`.
//! The first record of a commit carries its metadata block (author, committer,
//! summary, ...) up to the `filename` marker; later records of the same commit
//! go straight to the marker.

use crate::model::{FileBlameResult, Identity, IdentityMode};
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// The stream does not follow the incremental blame grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    pub line: usize,
    pub reason: String,
}

impl MalformedRecord {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// First line of every record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub hash: &'a str,
    pub original_line: u32,
    pub final_line: u32,
    pub line_count: u64,
}

/// Parses a record header, `None` if the line is anything else.
pub fn parse_header(line: &str) -> Option<Header<'_>> {
    let mut fields = line.split_whitespace();
    let hash = fields.next()?;
    let original_line = fields.next()?.parse().ok()?;
    let final_line = fields.next()?.parse().ok()?;
    let line_count = fields.next()?.parse().ok()?;
    if fields.next().is_some() || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(Header {
        hash,
        original_line,
        final_line,
        line_count,
    })
}

fn is_filename_marker(line: &str) -> bool {
    line == "filename" || line.starts_with("filename ")
}

fn identity_key(mode: IdentityMode) -> &'static str {
    match mode {
        IdentityMode::Author => "author",
        IdentityMode::Committer => "committer",
    }
}

#[derive(Debug, Default)]
struct CommitMeta {
    author: Option<String>,
    committer: Option<String>,
}

impl CommitMeta {
    fn apply(&mut self, line: &str) {
        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        match key {
            "author" => self.author = Some(value.to_string()),
            "committer" => self.committer = Some(value.to_string()),
            "author-mail" | "author-time" | "author-tz" | "committer-mail" | "committer-time"
            | "committer-tz" | "summary" | "previous" | "boundary" => {}
            "" => {}
            other => trace!(key = other, "skipping unknown blame metadata"),
        }
    }

    fn into_identity(self, mode: IdentityMode) -> Option<Identity> {
        match mode {
            IdentityMode::Author => self.author,
            IdentityMode::Committer => self.committer,
        }
    }
}

/// Where the parser stands inside the current record
enum State<'a> {
    /// Previous record closed by its `filename` marker (or start of stream)
    FilenameSeen,
    /// Header of an already described commit, waiting for the marker
    HeaderSeen { hash: &'a str, lines: u64 },
    /// Header of a new commit, its metadata block must follow
    MetadataExpected { hash: &'a str, lines: u64 },
    /// Inside the metadata block of a new commit
    MetadataConsuming {
        hash: &'a str,
        lines: u64,
        meta: CommitMeta,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlameParser {
    mode: IdentityMode,
}

impl BlameParser {
    pub fn new(mode: IdentityMode) -> Self {
        BlameParser { mode }
    }

    pub fn parse(&self, stream: &str) -> Result<FileBlameResult, MalformedRecord> {
        // hash -> identity, for commits whose metadata was already consumed
        let mut described: HashMap<&str, Identity> = HashMap::new();
        let mut result = FileBlameResult::default();
        let mut state = State::FilenameSeen;
        let mut line_no = 0;

        for (idx, line) in stream.lines().enumerate() {
            line_no = idx + 1;
            state = match state {
                State::FilenameSeen => {
                    if line.trim().is_empty() {
                        State::FilenameSeen
                    } else {
                        let header = parse_header(line).ok_or_else(|| {
                            let reason = format!("expected a record header, found '{}'", line);
                            MalformedRecord::new(line_no, reason)
                        })?;
                        if described.contains_key(header.hash) {
                            State::HeaderSeen {
                                hash: header.hash,
                                lines: header.line_count,
                            }
                        } else {
                            State::MetadataExpected {
                                hash: header.hash,
                                lines: header.line_count,
                            }
                        }
                    }
                }
                State::HeaderSeen { hash, lines } => {
                    if is_filename_marker(line) {
                        if let Some(identity) = described.get(hash) {
                            result.record(identity, hash, lines);
                        }
                        State::FilenameSeen
                    } else if parse_header(line).is_some() {
                        return Err(MalformedRecord::new(
                            line_no,
                            format!("record of commit {} has no filename marker", hash),
                        ));
                    } else {
                        State::HeaderSeen { hash, lines }
                    }
                }
                State::MetadataExpected { hash, lines } => {
                    if is_filename_marker(line) || parse_header(line).is_some() {
                        return Err(MalformedRecord::new(
                            line_no,
                            format!("metadata of commit {} is missing", hash),
                        ));
                    }
                    let mut meta = CommitMeta::default();
                    meta.apply(line);
                    State::MetadataConsuming { hash, lines, meta }
                }
                State::MetadataConsuming {
                    hash,
                    lines,
                    mut meta,
                } => {
                    if is_filename_marker(line) {
                        let identity = meta.into_identity(self.mode).ok_or_else(|| {
                            MalformedRecord::new(
                                line_no,
                                format!(
                                    "metadata of commit {} has no '{}' field",
                                    hash,
                                    identity_key(self.mode)
                                ),
                            )
                        })?;
                        result.record(&identity, hash, lines);
                        described.insert(hash, identity);
                        State::FilenameSeen
                    } else if parse_header(line).is_some() {
                        return Err(MalformedRecord::new(
                            line_no,
                            format!("metadata of commit {} is truncated", hash),
                        ));
                    } else {
                        meta.apply(line);
                        State::MetadataConsuming { hash, lines, meta }
                    }
                }
            };
        }

        match state {
            State::FilenameSeen => Ok(result),
            State::HeaderSeen { hash, .. }
            | State::MetadataExpected { hash, .. }
            | State::MetadataConsuming { hash, .. } => Err(MalformedRecord::new(
                line_no,
                format!("stream ended inside the record of commit {}", hash),
            )),
        }
    }
}
