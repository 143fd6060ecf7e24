// src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use gitfame::cli::Args;
use gitfame::filter::FileFilter;
use gitfame::git::{self, GitCli};
use gitfame::languages::LanguageTable;
use gitfame::{output, ranking, FileProcessor};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    let start_time = Instant::now();

    if let Err(e) = run(&args) {
        eprintln!("gitfame: {:#}", e);
        std::process::exit(1);
    }

    debug!("total time: {:.2?}", start_time.elapsed());
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.jobs == 0 {
        bail!("--jobs must be at least 1");
    }
    let languages = LanguageTable::builtin().context("embedded language table is invalid")?;
    let filter = FileFilter::new(&args.filter_options(), &languages)?;

    let files = git::list_files(&args.repository, &args.revision).with_context(|| {
        format!(
            "cannot list files of {} at {}",
            args.repository.display(),
            args.revision
        )
    })?;
    let files = filter.apply(files);
    info!(files = files.len(), revision = %args.revision, "files selected");

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::with_template("{msg} [{bar:20}] {percent}%")?;
        bar.set_style(style.progress_chars("#."));
        bar.set_message("Blaming files");
        bar
    };

    let source = GitCli::new(&args.repository, &args.revision);
    let store = FileProcessor::new(&source, args.identity_mode())
        .jobs(args.jobs)
        .run(&files, &progress)?;
    let authors = ranking::rank(store.into_snapshot(), args.order_by);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    output::write_authors(&mut out, &authors, args.format)?;
    out.flush()?;
    Ok(())
}
