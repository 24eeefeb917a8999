//! Parse worker pool
//!
//! CPU-bound HTML parsing runs on a fixed-size rayon pool so it never stalls
//! the async runtime that schedules network I/O. Submitting a task returns a
//! [`ParseHandle`] that resolves once that specific task completes.
//!
//! The pool starts lazily on first submission and shuts down exactly once;
//! calling [`WorkerPool::shutdown`] on a stopped pool is a no-op. Dropping the
//! pool shuts it down as well.

use crate::extract::ExtractError;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;

/// Worker pool failures, distinct from the extraction errors tasks return
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to start worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),

    #[error("parse task was dropped before completing")]
    TaskDropped,

    #[error("parse task panicked")]
    TaskPanicked,
}

/// Default pool size: half the available parallelism, at least one
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

/// Fixed-size pool of parse workers
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
    pool: Mutex<Option<Arc<ThreadPool>>>,
}

/// Pending result of a submitted parse task
#[derive(Debug)]
pub struct ParseHandle<T> {
    rx: oneshot::Receiver<Result<Result<T, ExtractError>, PoolError>>,
}

impl<T> ParseHandle<T> {
    /// Waits for the task
    ///
    /// The outer result reports pool failures; the inner result is the
    /// extraction outcome, passed through unchanged.
    pub async fn join(self) -> Result<Result<T, ExtractError>, PoolError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(PoolError::TaskDropped),
        }
    }
}

impl WorkerPool {
    /// Creates a stopped pool; `None` selects [`default_pool_size`]
    pub fn new(size: Option<usize>) -> Self {
        Self {
            size: size.unwrap_or_else(default_pool_size).max(1),
            pool: Mutex::new(None),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// Starts the pool if it is not already running
    pub fn start(&self) -> Result<Arc<ThreadPool>, PoolError> {
        let mut guard = self.lock();
        if let Some(pool) = guard.as_ref() {
            return Ok(Arc::clone(pool));
        }

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(self.size)
                .thread_name(|i| format!("parse-worker-{}", i))
                .build()?,
        );
        tracing::debug!("Started parse worker pool with {} workers", self.size);

        *guard = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Submits a parse task
    ///
    /// Starts the pool on first use.
    ///
    /// # Arguments
    ///
    /// * `task` - CPU-bound extraction to run on a worker thread
    ///
    /// # Returns
    ///
    /// * `Ok(ParseHandle)` - Resolves once this task completes
    /// * `Err(PoolError::Build)` - The pool could not be started
    pub fn submit<T, F>(&self, task: F) -> Result<ParseHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
    {
        let pool = self.start()?;
        let (tx, rx) = oneshot::channel();

        pool.spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(task)).map_err(|_| PoolError::TaskPanicked);
            // Receiver gone means the caller stopped waiting
            let _ = tx.send(outcome);
        });

        Ok(ParseHandle { rx })
    }

    /// Stops the pool; a no-op when it is not running
    ///
    /// Tasks already queued still run to completion on the rayon threads.
    pub fn shutdown(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("Shut down parse worker pool");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<ThreadPool>>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
