// src/ranking.rs

use crate::model::{AuthorStat, SortKey};
use std::cmp::Ordering;

/// Orders a frozen snapshot by `key`, descending, breaking ties on the other
/// two counters (descending) and finally on the name (ascending).
pub fn rank(mut authors: Vec<AuthorStat>, key: SortKey) -> Vec<AuthorStat> {
    authors.sort_by(|a, b| compare(a, b, key));
    authors
}

pub fn compare(a: &AuthorStat, b: &AuthorStat, key: SortKey) -> Ordering {
    let lines = || b.lines.cmp(&a.lines);
    let commits = || b.commits().cmp(&a.commits());
    let files = || b.files.cmp(&a.files);

    let metrics = match key {
        SortKey::Lines => lines().then_with(commits).then_with(files),
        SortKey::Commits => commits().then_with(lines).then_with(files),
        SortKey::Files => files().then_with(lines).then_with(commits),
    };
    metrics.then_with(|| a.name.cmp(&b.name))
}
