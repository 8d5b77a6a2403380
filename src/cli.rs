use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::model::ThreadId;
use crate::paths::Paths;

/// Terminal viewer for agent conversation threads.
#[derive(Debug, Clone, Parser)]
#[command(name = "thread-lens", version, about)]
pub struct Cli {
    /// Directory for the thread database, history and logs
    #[arg(long, env = "THREAD_LENS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory the agent transport writes `<thread_id>.jsonl` feeds into
    #[arg(long, env = "THREAD_LENS_FEED_DIR")]
    pub feed_dir: Option<PathBuf>,

    /// Thread to open on startup
    #[arg(long, value_parser = parse_thread_id)]
    pub thread: Option<ThreadId>,

    /// Log file path (defaults to `<data_dir>/thread-lens.log`)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Paths with command-line overrides applied.
    pub fn paths(&self) -> Paths {
        let mut paths = Paths::resolve(self.data_dir.as_deref());
        if let Some(dir) = &self.feed_dir {
            paths = paths.with_feed_dir(dir.clone());
        }
        if let Some(file) = &self.log_file {
            paths = paths.with_log_file(file.clone());
        }
        paths
    }

    pub fn initial_thread(&self) -> Option<ThreadId> {
        self.thread.clone()
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "thread_lens=debug"
        } else {
            "warn"
        }
    }
}

fn parse_thread_id(raw: &str) -> Result<ThreadId, String> {
    ThreadId::try_new(raw)
        .ok_or_else(|| format!("invalid thread id {:?}: must be non-blank without path separators", raw))
}

/// Route `tracing` output to `log_file`. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(log_file: &Path, default_filter: &str) -> io::Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
