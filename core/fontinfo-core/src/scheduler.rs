//! Bounded worker pool with one result slot per submitted task
//!
//! Tasks run on a dedicated rayon pool. Each submission hands back a
//! [`PendingResult`] carrying its submission index, so callers can resolve
//! results in submission order no matter which worker finishes first.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::CollectError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Handle to one submitted task.
#[derive(Debug)]
pub struct PendingResult<T> {
    pub index: usize,
    pub path: PathBuf,
    rx: Receiver<Option<T>>,
}

impl<T> PendingResult<T> {
    /// Block until the task reports, or until `cancel` fires.
    ///
    /// Cancelled, failed and vanished (panicked) tasks all resolve to `None`.
    pub fn wait(self, cancel: &CancelToken) -> Option<T> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

/// How the pool wound down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every task had finished within the grace period.
    Drained,
    /// The grace period ran out; the remaining tasks were cancelled.
    Forced { abandoned: usize },
}

/// Fixed-size worker pool.
pub struct Scheduler {
    pool: ThreadPool,
    cancel: CancelToken,
    outstanding: Arc<AtomicUsize>,
    submitted: usize,
}

impl Scheduler {
    pub fn new(workers: usize, cancel: CancelToken) -> Result<Self, CollectError> {
        if workers == 0 {
            return Err(CollectError::InvalidJobs(workers));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fontinfo-worker-{i}"))
            // rayon aborts on a panicking spawn unless a handler is set
            .panic_handler(|_| log::error!("font task panicked; its result is dropped"))
            .build()?;
        log::debug!("started worker pool with {workers} threads");

        Ok(Self {
            pool,
            cancel,
            outstanding: Arc::new(AtomicUsize::new(0)),
            submitted: 0,
        })
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue `job` for `path`. A task that starts after cancellation, or that
    /// finishes after it, reports no result.
    pub fn submit<T, F>(&mut self, path: PathBuf, job: F) -> PendingResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Option<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let cancel = self.cancel.clone();
        let outstanding = Arc::clone(&self.outstanding);
        outstanding.fetch_add(1, Ordering::SeqCst);

        self.pool.spawn(move || {
            let _done = Completion(outstanding);
            if cancel.is_cancelled() {
                let _ = tx.send(None);
                return;
            }
            let result = job();
            // The receiver may already be gone after a cancellation.
            let _ = tx.send(if cancel.is_cancelled() { None } else { result });
        });

        let index = self.submitted;
        self.submitted += 1;
        PendingResult { index, path, rx }
    }

    /// Number of tasks submitted and not yet finished.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for outstanding tasks, then cancel whatever is left.
    pub fn shutdown(self, grace: Duration) -> ShutdownOutcome {
        let deadline = Instant::now() + grace;
        while self.outstanding() > 0 && !self.cancel.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }

        let abandoned = self.outstanding();
        if abandoned == 0 {
            return ShutdownOutcome::Drained;
        }
        self.cancel.cancel();
        log::warn!("cancelled {abandoned} unfinished font tasks");
        ShutdownOutcome::Forced { abandoned }
    }
}

/// Decrements the outstanding count when a task ends, even by panic.
struct Completion(Arc<AtomicUsize>);

impl Drop for Completion {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
