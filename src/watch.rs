//! Watch mode for automatic rebuilds on file changes
//!
//! Provides file system watching with debouncing for the
//! `tokensmith build --watch` command.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

use crate::build::{BuildError, BuildResult};
use crate::config::schema::WatchConfig;
use crate::source::is_token_file;

/// Reasons watch mode stops
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("could not start file watcher: {0}")]
    WatcherInit(#[source] notify::Error),
    #[error("could not watch {}: {source}", .path.display())]
    WatchPath {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    /// The debouncer hung up
    #[error("file watcher disconnected")]
    Disconnected,
    #[error("token directory {} does not exist", .0.display())]
    SourceNotFound(PathBuf),
}

/// Remembers whether the previous build failed, to announce recoveries.
#[derive(Debug, Default)]
pub struct FailureTracker {
    last_failed: bool,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a build outcome. Returns true when a failing build was fixed.
    pub fn update(&mut self, succeeded: bool) -> bool {
        let recovered = self.last_failed && succeeded;
        self.last_failed = !succeeded;
        recovered
    }

    pub fn is_failing(&self) -> bool {
        self.last_failed
    }
}

/// Options for watch mode
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Token source directory to watch
    pub src_dir: PathBuf,
    /// Watch configuration (debounce, clear screen)
    pub config: WatchConfig,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { src_dir: PathBuf::from("tokens"), config: WatchConfig::default() }
    }
}

/// Clear the terminal screen
fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        ms @ 0..=999 => format!("{}ms", ms),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// Wall-clock `HH:MM:SS` (UTC) prefix for watch messages
fn timestamp() -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    format!("{:02}:{:02}:{:02}", secs / 3600 % 24, secs / 60 % 60, secs % 60)
}

/// Token files among a batch of debounced events, deduplicated.
fn changed_token_files(events: &[DebouncedEvent]) -> Vec<&Path> {
    let mut changed: Vec<&Path> = events
        .iter()
        .filter(|e| matches!(e.kind, DebouncedEventKind::Any) && is_token_file(&e.path))
        .map(|e| e.path.as_path())
        .collect();
    changed.sort();
    changed.dedup();
    changed
}

fn announce_watching(src_dir: &Path) {
    println!("[{}] Watching {} for token changes", timestamp(), src_dir.display());
}

/// Run one build and report it. Returns whether it succeeded.
fn run_build<F>(build: &mut F, tracker: &mut FailureTracker) -> bool
where
    F: FnMut() -> Result<BuildResult, BuildError>,
{
    println!("[{}] Building...", timestamp());
    let start = Instant::now();
    let outcome = build();
    let elapsed = start.elapsed();

    let succeeded = outcome.is_ok();
    if tracker.update(succeeded) {
        println!("[{}] Fixed: build is passing again", timestamp());
    }

    match outcome {
        Ok(result) => {
            println!(
                "[{}] Build complete ({}) - Written: {} | Unchanged: {}",
                timestamp(),
                format_duration(elapsed),
                result.written_count(),
                result.unchanged_count()
            );
            for warning in &result.warnings {
                eprintln!("[{}] Warning: {}", timestamp(), warning);
            }
        }
        Err(e) => {
            println!("[{}] Build failed ({})", timestamp(), format_duration(elapsed));
            eprintln!("[{}] Error: {}", timestamp(), e);
        }
    }
    succeeded
}

/// Watch for token file changes and rebuild automatically.
///
/// Runs an initial build, then calls `build` again after every debounced
/// batch of `.json`/`.json5` changes. Build failures are reported and
/// watching continues. Blocks until interrupted.
pub fn watch_and_rebuild<F>(options: WatchOptions, mut build: F) -> Result<(), WatchError>
where
    F: FnMut() -> Result<BuildResult, BuildError>,
{
    if !options.src_dir.exists() {
        return Err(WatchError::SourceNotFound(options.src_dir.clone()));
    }

    let (tx, rx) = channel();
    let debounce = Duration::from_millis(u64::from(options.config.debounce_ms));
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;
    debouncer
        .watcher()
        .watch(&options.src_dir, RecursiveMode::Recursive)
        .map_err(|source| WatchError::WatchPath { path: options.src_dir.clone(), source })?;

    let mut tracker = FailureTracker::new();
    let clear = || {
        if options.config.clear_screen {
            clear_screen();
        }
    };

    clear();
    run_build(&mut build, &mut tracker);
    announce_watching(&options.src_dir);

    loop {
        let events = match rx.recv() {
            Ok(Ok(events)) => events,
            Ok(Err(error)) => {
                warn!(%error, "file watcher reported an error");
                continue;
            }
            Err(_) => return Err(WatchError::Disconnected),
        };

        let changed = changed_token_files(&events);
        if changed.is_empty() {
            debug!(events = events.len(), "ignoring non-token changes");
            continue;
        }
        clear();
        for path in changed {
            let shown = path.strip_prefix(&options.src_dir).unwrap_or(path);
            println!("[{}] Changed: {}", timestamp(), shown.display());
        }
        run_build(&mut build, &mut tracker);
        announce_watching(&options.src_dir);
    }
}
