// src/model.rs

use crate::error::Error;
use clap::ValueEnum;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::str::FromStr;

/// Opaque commit identifier as printed by git
pub type CommitHash = String;

/// Display name used as the aggregation key
pub type Identity = String;

/// Which signature of a commit a line is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    #[default]
    Author,
    Committer,
}

impl IdentityMode {
    pub fn from_use_committer(use_committer: bool) -> Self {
        if use_committer {
            IdentityMode::Committer
        } else {
            IdentityMode::Author
        }
    }
}

/// Primary ordering of the final author table
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Attributed lines
    #[default]
    Lines,
    /// Distinct commits
    Commits,
    /// Touched files
    Files,
}

/// How the ranked table is rendered
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Tabular,
    /// Comma separated values with a header row
    Csv,
    /// A single JSON array
    Json,
    /// One JSON object per line
    JsonLines,
}

fn parse_value_enum<T: ValueEnum>(what: &str, s: &str) -> Result<T, Error> {
    T::from_str(s, false).map_err(|_| {
        let allowed: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        Error::Configuration(format!(
            "{} '{}' is unknown, should be one of [{}]",
            what,
            s,
            allowed.join(" ")
        ))
    })
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value_enum("order-by", s)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value_enum("format", s)
    }
}

/// Aggregate counters for one identity across the whole run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorStat {
    pub name: Identity,
    pub lines: u64,
    pub files: u64,
    pub commit_set: BTreeSet<CommitHash>,
}

impl AuthorStat {
    pub fn new(name: impl Into<Identity>) -> Self {
        AuthorStat {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of distinct commits, always derived from the set
    pub fn commits(&self) -> usize {
        self.commit_set.len()
    }
}

/// What one file contributed, keyed by identity. Consumed by the store merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBlameResult {
    pub lines: HashMap<Identity, u64>,
    pub commits: HashMap<Identity, HashSet<CommitHash>>,
}

impl FileBlameResult {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn total_lines(&self) -> u64 {
        self.lines.values().sum()
    }

    pub(crate) fn record(&mut self, identity: &str, hash: &str, lines: u64) {
        *self.lines.entry(identity.to_string()).or_insert(0) += lines;
        self.commits
            .entry(identity.to_string())
            .or_default()
            .insert(hash.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_known_values() {
        assert_eq!("lines".parse::<SortKey>().unwrap(), SortKey::Lines);
        assert_eq!("commits".parse::<SortKey>().unwrap(), SortKey::Commits);
        assert_eq!("files".parse::<SortKey>().unwrap(), SortKey::Files);
    }

    #[test]
    fn unknown_sort_key_is_configuration_error() {
        let err = "churn".parse::<SortKey>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("churn"));
    }

    #[test]
    fn output_format_accepts_json_lines() {
        assert_eq!(
            "json-lines".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonLines
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn record_keeps_commits_distinct() {
        let mut result = FileBlameResult::default();
        result.record("Alice", "aaa", 2);
        result.record("Alice", "aaa", 1);
        result.record("Bob", "bbb", 0);
        assert_eq!(result.lines["Alice"], 3);
        assert_eq!(result.commits["Alice"].len(), 1);
        assert_eq!(result.total_lines(), 3);
        assert_eq!(result.commits.len(), 2);
    }
}
