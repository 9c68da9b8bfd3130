//! Run configuration for fontinfo-core
//!
//! All of it is read-only once the pipeline starts and is shared by
//! reference (or `Arc`) with the workers.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name the report is written to, relative to the working directory.
pub const REPORT_FILE_NAME: &str = "fonts_info.json";

/// How long [`crate::scheduler::Scheduler::shutdown`] waits before cancelling.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(60);

/// The two directories a run inventories, system first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirs {
    pub system: PathBuf,
    pub user: PathBuf,
}

impl FontDirs {
    pub fn new(system: impl Into<PathBuf>, user: impl Into<PathBuf>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Directories in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [self.system.as_path(), self.user.as_path()].into_iter()
    }
}

/// Lowercase keywords that flag a name-table string as license related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseHints {
    hints: Vec<String>,
}

impl LicenseHints {
    pub const DEFAULT: [&'static str; 4] = ["copyright", "trademark", "license", "microsoft"];

    pub fn new<I, S>(hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hints = hints
            .into_iter()
            .map(|h| h.as_ref().to_ascii_lowercase())
            .collect();
        Self { hints }
    }

    /// ASCII case-insensitive substring match against any hint.
    pub fn matches(&self, text: &str) -> bool {
        let lowered = text.to_ascii_lowercase();
        self.hints.iter().any(|hint| lowered.contains(hint.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.hints
    }
}

impl Default for LicenseHints {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Knobs for [`crate::collect::collect_font_info`].
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Worker count; `None` uses the host's hardware parallelism.
    pub jobs: Option<usize>,
    pub follow_symlinks: bool,
    pub grace_period: Duration,
    pub hints: LicenseHints,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            follow_symlinks: false,
            grace_period: DEFAULT_GRACE_PERIOD,
            hints: LicenseHints::default(),
        }
    }
}

impl CollectOptions {
    /// Resolve the worker count, falling back to one worker when the host
    /// cannot report its parallelism.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
