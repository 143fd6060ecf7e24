// src/stats.rs

use crate::model::{AuthorStat, CommitHash, FileBlameResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Shared accumulator of per-identity counters.
///
/// Each operation holds the lock for its whole read-modify-write, entries are
/// created on first reference and only ever grow, so merges commute.
#[derive(Debug, Default)]
pub struct StatisticsStore {
    authors: Mutex<HashMap<String, AuthorStat>>,
}

impl StatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lines(&self, name: &str, lines: u64) {
        let mut authors = self.authors.lock();
        entry(&mut authors, name).lines += lines;
    }

    pub fn add_files(&self, name: &str, files: u64) {
        let mut authors = self.authors.lock();
        entry(&mut authors, name).files += files;
    }

    pub fn add_commits<I>(&self, name: &str, commits: I)
    where
        I: IntoIterator<Item = CommitHash>,
    {
        let mut authors = self.authors.lock();
        entry(&mut authors, name).commit_set.extend(commits);
    }

    /// Folds one file in: every identity present gets one file, its lines
    /// and its commits.
    pub fn merge_file(&self, result: FileBlameResult) {
        let FileBlameResult { mut lines, commits } = result;
        for (name, hashes) in commits {
            self.add_lines(&name, lines.remove(&name).unwrap_or(0));
            self.add_files(&name, 1);
            self.add_commits(&name, hashes);
        }
        for (name, count) in lines {
            self.add_lines(&name, count);
        }
    }

    pub fn len(&self) -> usize {
        self.authors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every entry, in no particular order.
    pub fn snapshot(&self) -> Vec<AuthorStat> {
        self.authors.lock().values().cloned().collect()
    }

    /// Freezes the store once all producers are done.
    pub fn into_snapshot(self) -> Vec<AuthorStat> {
        self.authors.into_inner().into_values().collect()
    }
}

fn entry<'a>(authors: &'a mut HashMap<String, AuthorStat>, name: &str) -> &'a mut AuthorStat {
    authors
        .entry(name.to_string())
        .or_insert_with(|| AuthorStat::new(name))
}
