// src/pipeline.rs

use crate::blame::BlameParser;
use crate::error::{Error, Result};
use crate::history::resolve_creation;
use crate::model::{FileBlameResult, IdentityMode};
use crate::queue::{work_queue, Drain};
use crate::stats::StatisticsStore;
use indicatif::ProgressBar;
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_JOBS: usize = 8;

/// Supplies the raw streams the core decodes.
pub trait HistorySource: Sync {
    /// `git blame --incremental` output; empty when no line is attributed.
    fn blame(&self, path: &str) -> Result<String>;

    /// `git log --format=fuller` output, asked only for lineless files.
    fn creation_log(&self, path: &str) -> Result<String>;
}

/// Fixed pool of workers draining a bounded queue of paths into a store.
pub struct FileProcessor<'a, S: ?Sized> {
    source: &'a S,
    mode: IdentityMode,
    parser: BlameParser,
    jobs: usize,
}

impl<'a, S: HistorySource + ?Sized> FileProcessor<'a, S> {
    pub fn new(source: &'a S, mode: IdentityMode) -> Self {
        FileProcessor {
            source,
            mode,
            parser: BlameParser::new(mode),
            jobs: DEFAULT_JOBS,
        }
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Fetches and decodes one file, falling back to its history when blame
    /// attributes nothing.
    pub fn process_file(&self, path: &str) -> Result<FileBlameResult> {
        let stream = self.source.blame(path)?;
        let result = self
            .parser
            .parse(&stream)
            .map_err(|source| Error::MalformedRecord {
                path: path.to_string(),
                source,
            })?;
        if !result.is_empty() {
            debug!(path, lines = result.total_lines(), "blamed");
            return Ok(result);
        }

        let log = self.source.creation_log(path)?;
        let record =
            resolve_creation(&log, self.mode).map_err(|source| Error::HistoryResolution {
                path: path.to_string(),
                source,
            })?;
        debug!(path, identity = %record.identity, "no blamed lines, credited from history");
        Ok(record.into_file_result())
    }

    /// Runs every file through the pool. The first failure cancels the queue
    /// and is returned; nothing gathered so far survives it.
    pub fn run(&self, files: &[String], progress: &ProgressBar) -> Result<StatisticsStore> {
        if self.jobs == 0 {
            return Err(Error::Configuration("jobs must be at least 1".to_string()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("gitfame-worker-{}", i))
            .build()?;

        let start = Instant::now();
        let store = StatisticsStore::new();
        let failure: Mutex<Option<Error>> = Mutex::new(None);
        let (feeder, drain) = work_queue::<&str>(self.jobs);
        progress.set_length(files.len() as u64);

        pool.in_place_scope(|scope| {
            for _ in 0..self.jobs {
                let drain = drain.clone();
                let store = &store;
                let failure = &failure;
                scope.spawn(move |_| self.work(drain, store, failure));
            }
            drop(drain);

            for (i, path) in files.iter().enumerate() {
                if !feeder.push(path.as_str()) {
                    break;
                }
                progress.set_position(i as u64 + 1);
            }
            drop(feeder);
        });
        progress.finish_and_clear();

        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        info!(
            files = files.len(),
            authors = store.len(),
            "processed in {:.2?}",
            start.elapsed()
        );
        Ok(store)
    }

    fn work(&self, drain: Drain<&str>, store: &StatisticsStore, failure: &Mutex<Option<Error>>) {
        while let Some(path) = drain.pop() {
            match self.process_file(path) {
                Ok(result) => store.merge_file(result),
                Err(err) => {
                    drain.cancellation().cancel();
                    let mut first = failure.lock();
                    if first.is_none() {
                        *first = Some(err);
                    }
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthorStat;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemorySource {
        blame: HashMap<String, String>,
        log: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl MemorySource {
        fn with_blame(mut self, path: &str, stream: &str) -> Self {
            self.blame.insert(path.to_string(), stream.to_string());
            self
        }

        fn with_log(mut self, path: &str, stream: &str) -> Self {
            self.log.insert(path.to_string(), stream.to_string());
            self
        }
    }

    impl HistorySource for MemorySource {
        fn blame(&self, path: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.blame
                .get(path)
                .cloned()
                .ok_or_else(|| Error::fetch(path, "no such path"))
        }

        fn creation_log(&self, path: &str) -> Result<String> {
            Ok(self.log.get(path).cloned().unwrap_or_default())
        }
    }

    fn block(hash: &str, lines: u32, author: &str) -> String {
        format!(
            "{hash} 1 1 {lines}\nauthor {author}\nauthor-mail <{author}>\nauthor-time 1\n\
             author-tz +0000\ncommitter {author}\ncommitter-mail <{author}>\ncommitter-time 1\n\
             committer-tz +0000\nsummary s\nfilename f\n"
        )
    }

    fn sorted(store: StatisticsStore) -> Vec<AuthorStat> {
        let mut stats = store.into_snapshot();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    #[test]
    fn single_hash_file_counts_once() {
        let stream = format!("{}aaa 1 3 1\nfilename f\n", block("aaa", 2, "Alice"));
        let source = MemorySource::default().with_blame("f", &stream);
        let store = FileProcessor::new(&source, IdentityMode::Author)
            .run(&["f".to_string()], &ProgressBar::hidden())
            .unwrap();
        let stats = sorted(store);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Alice");
        assert_eq!(stats[0].lines, 3);
        assert_eq!(stats[0].files, 1);
        assert_eq!(stats[0].commits(), 1);
    }

    #[test]
    fn empty_file_falls_back_to_history() {
        let source = MemorySource::default()
            .with_blame("a.rs", &block("aaa", 4, "Alice"))
            .with_blame("empty.rs", "")
            .with_log(
                "empty.rs",
                "commit bbb\nAuthor:     Bob <bob@x>\nCommit:     Bob <bob@x>\n\n    msg\n",
            );
        let files = vec!["a.rs".to_string(), "empty.rs".to_string()];
        let stats = sorted(
            FileProcessor::new(&source, IdentityMode::Author)
                .jobs(2)
                .run(&files, &ProgressBar::hidden())
                .unwrap(),
        );
        assert_eq!(stats[1].name, "Bob");
        assert_eq!(stats[1].lines, 0);
        assert_eq!(stats[1].files, 1);
        assert_eq!(stats[1].commits(), 1);
        assert_eq!(stats[0].lines, 4);
    }

    #[test]
    fn unresolvable_history_fails_the_run() {
        let source = MemorySource::default().with_blame("empty.rs", "");
        let err = FileProcessor::new(&source, IdentityMode::Author)
            .run(&["empty.rs".to_string()], &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, Error::HistoryResolution { .. }));
        assert_eq!(err.path(), Some("empty.rs"));
    }

    #[test]
    fn malformed_stream_names_the_file() {
        let source = MemorySource::default().with_blame("bad.rs", "not a header\n");
        let err = FileProcessor::new(&source, IdentityMode::Author)
            .run(&["bad.rs".to_string()], &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
        assert!(err.to_string().contains("bad.rs"));
    }

    #[test]
    fn first_failure_stops_the_queue() {
        let mut source = MemorySource::default();
        let mut files = vec!["missing".to_string()];
        for i in 0..100 {
            let path = format!("f{}", i);
            source = source.with_blame(&path, &block("aaa", 1, "Alice"));
            files.push(path);
        }
        let err = FileProcessor::new(&source, IdentityMode::Author)
            .jobs(1)
            .run(&files, &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_jobs_is_rejected() {
        let source = MemorySource::default();
        let err = FileProcessor::new(&source, IdentityMode::Author)
            .jobs(0)
            .run(&[], &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn parallel_and_serial_runs_agree() {
        let mut source = MemorySource::default();
        let mut files = Vec::new();
        for i in 0..64 {
            let path = format!("src/{}.rs", i);
            let author = ["Alice", "Bob", "Carol"][i % 3];
            let stream = format!(
                "{}{}",
                block(&format!("{:x}", i % 7), (i % 5) as u32, author),
                block("ffff", 1, "Dave")
            );
            source = source.with_blame(&path, &stream);
            files.push(path);
        }
        let serial = FileProcessor::new(&source, IdentityMode::Author)
            .jobs(1)
            .run(&files, &ProgressBar::hidden())
            .unwrap();
        let parallel = FileProcessor::new(&source, IdentityMode::Author)
            .jobs(8)
            .run(&files, &ProgressBar::hidden())
            .unwrap();
        let serial = sorted(serial);
        assert_eq!(serial, sorted(parallel));
        let dave = serial.iter().find(|s| s.name == "Dave").unwrap();
        assert_eq!(dave.files, 64);
        assert_eq!(dave.commits(), 1);
    }
}
