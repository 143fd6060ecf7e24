// src/lib.rs

//! Per-author line, commit and file counts of a git tree, computed from
//! `git blame --incremental`.

pub mod blame;
pub mod cli;
pub mod error;
pub mod filter;
pub mod git;
pub mod history;
pub mod languages;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod queue;
pub mod ranking;
pub mod stats;

pub use error::{Error, Result};
pub use model::{AuthorStat, FileBlameResult, IdentityMode, OutputFormat, SortKey};
pub use pipeline::{FileProcessor, HistorySource};
pub use stats::StatisticsStore;
