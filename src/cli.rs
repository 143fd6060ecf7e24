// src/cli.rs

use crate::filter::FilterOptions;
use crate::model::{IdentityMode, OutputFormat, SortKey};
use crate::pipeline::DEFAULT_JOBS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitfame", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to analyze
    #[arg(long, default_value = ".")]
    pub repository: PathBuf,

    /// Revision whose tree is blamed
    #[arg(long, default_value = "HEAD")]
    pub revision: String,

    /// Primary sort key of the output rows
    #[arg(long, value_enum, default_value_t = SortKey::Lines)]
    pub order_by: SortKey,

    /// Attribute lines to the committer instead of the author
    #[arg(long)]
    pub use_committer: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tabular)]
    pub format: OutputFormat,

    /// Only count files with one of these extensions, e.g. '.go,.md'
    #[arg(long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only count files of these languages, e.g. 'go,markdown'
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Glob patterns of files to leave out
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Glob patterns; files matching none of them are left out
    #[arg(long, value_delimiter = ',')]
    pub restrict_to: Vec<String>,

    /// Number of files blamed in parallel
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Log every processed file
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    pub fn identity_mode(&self) -> IdentityMode {
        IdentityMode::from_use_committer(self.use_committer)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            extensions: self.extensions.clone(),
            languages: self.languages.clone(),
            exclude: self.exclude.clone(),
            restrict_to: self.restrict_to.clone(),
        }
    }
}
