//! Parallel map collaborator
//!
//! A [`ParallelExecutor`] maps a batch of elements on a worker pool and hands back
//! the results in input order. The caller blocks until the whole batch is done.
//! Pool size and kind come from a [`ConcurrencyConfig`]:
//!
//! - `thread = true` / `process = true`: one worker per hardware thread
//! - `thread = 4` / `process = 4`: an explicit number of workers
//! - neither: a process-kind pool of the default size
//!
//! Closures cannot be shipped to another process, so both kinds run on an
//! in-process thread pool; the kind is kept for reporting.
//!
//! # Examples
//!
//! ```ignore
//! let executor = ParallelExecutor::from_config(&ConcurrencyConfig::threads(4))?;
//! let squares = Pipeline::range(1000)
//!     .parallel(&executor)
//!     .map(|x| x * x)?
//!     .sequential()
//!     .to_list();
//! ```

use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Deserialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info};

/// A pool toggle (`true` means hardware-sized) or an explicit worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PoolSetting {
    Enabled(bool),
    Workers(usize),
}

impl PoolSetting {
    /// `None` when the pool is switched off, `Some(0)` for hardware-sized.
    fn workers(self) -> Option<usize> {
        match self {
            PoolSetting::Enabled(true) => Some(0),
            PoolSetting::Enabled(false) => None,
            PoolSetting::Workers(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Thread,
    Process,
}

/// Worker pool options. `thread` wins when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ConcurrencyConfig {
    #[serde(default)]
    pub thread: Option<PoolSetting>,
    #[serde(default)]
    pub process: Option<PoolSetting>,
}

impl ConcurrencyConfig {
    pub fn threads(workers: usize) -> Self {
        ConcurrencyConfig {
            thread: Some(PoolSetting::Workers(workers)),
            process: None,
        }
    }

    /// Pool kind and worker count, with 0 resolved to the hardware concurrency.
    pub fn resolve(&self) -> (PoolKind, usize) {
        let (kind, workers) = match (
            self.thread.and_then(PoolSetting::workers),
            self.process.and_then(PoolSetting::workers),
        ) {
            (Some(n), _) => (PoolKind::Thread, n),
            (None, Some(n)) => (PoolKind::Process, n),
            (None, None) => (PoolKind::Process, 0),
        };
        let workers = if workers == 0 {
            hardware_concurrency()
        } else {
            workers
        };
        (kind, workers)
    }
}

fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Order-preserving batch mapper backed by a dedicated thread pool.
pub struct ParallelExecutor {
    pool: ThreadPool,
    kind: PoolKind,
    workers: usize,
}

impl ParallelExecutor {
    /// Executor with the default configuration.
    pub fn new() -> Result<Self> {
        Self::from_config(&ConcurrencyConfig::default())
    }

    pub fn from_config(config: &ConcurrencyConfig) -> Result<Self> {
        let (kind, workers) = config.resolve();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("seqflow-worker-{index}"))
            .build()
            .map_err(|e| PipelineError::Parallel(e.to_string()))?;
        info!(?kind, workers, "parallel executor ready");
        Ok(ParallelExecutor {
            pool,
            kind,
            workers,
        })
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Map every item on the pool, returning results in input order.
    ///
    /// # Errors
    ///
    /// `PipelineError::Parallel` if any worker panics. The rest of the batch is
    /// allowed to unwind before the error is returned.
    pub fn execute<T, U, F>(&self, f: F, items: Vec<T>) -> Result<Vec<U>>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        let len = items.len();
        debug!(len, workers = self.workers, "dispatching parallel batch");
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool
                .install(|| items.into_par_iter().map(|item| f(item)).collect())
        }))
        .map_err(|payload| PipelineError::Parallel(panic_message(payload.as_ref())))
    }
}

impl std::fmt::Debug for ParallelExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelExecutor")
            .field("kind", &self.kind)
            .field("workers", &self.workers)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {message}")
    } else {
        "worker panicked".to_string()
    }
}

/// A pipeline whose `map` runs on a [`ParallelExecutor`].
pub struct ParallelPipeline<'a, 'e, T> {
    pipeline: Pipeline<'a, T>,
    executor: &'e ParallelExecutor,
}

impl<'a, 'e, T: Send + 'a> ParallelPipeline<'a, 'e, T> {
    /// Map the remaining elements on the executor's pool.
    ///
    /// Drains the upstream pipeline first; the result is buffered.
    pub fn map<U, F>(self, f: F) -> Result<ParallelPipeline<'a, 'e, U>>
    where
        U: Send + 'a,
        F: Fn(T) -> U + Send + Sync,
    {
        let mapped = self.executor.execute(f, self.pipeline.to_list())?;
        Ok(ParallelPipeline {
            pipeline: Pipeline::from(mapped),
            executor: self.executor,
        })
    }

    /// Back to ordinary sequential adapters.
    pub fn sequential(self) -> Pipeline<'a, T> {
        self.pipeline
    }
}

impl<'a, T: 'a> Pipeline<'a, T> {
    /// Route subsequent `map` calls through `executor`.
    pub fn parallel<'e>(self, executor: &'e ParallelExecutor) -> ParallelPipeline<'a, 'e, T> {
        ParallelPipeline {
            pipeline: self,
            executor,
        }
    }

    /// Map on `executor` in one step, returning a sequential pipeline.
    pub fn par_map<U, F>(self, executor: &ParallelExecutor, f: F) -> Result<Pipeline<'a, U>>
    where
        T: Send,
        U: Send + 'a,
        F: Fn(T) -> U + Send + Sync,
    {
        Ok(Pipeline::from(executor.execute(f, self.to_list())?))
    }
}
