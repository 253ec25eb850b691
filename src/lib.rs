//! # seqflow
//!
//! Lazy, single-pass sequence pipelines.
//!
//! A [`Pipeline`] wraps any source of elements, finite or not, and exposes a fluent
//! chain of adapters (`filter`, `map`, `chunk`, `distinct`, `drop_right`, ...).
//! Adapters only describe work. Elements start flowing when a terminal operation
//! (`to_list`, `group_by`, `first`, `join`, `collect`, ...) drains the chain.
//!
//! Layout
//!
//! src/
//!   ├── pipeline     The pipeline type, its cursor, adapters and terminals
//!   ├── nested       Arbitrarily nested values for `flatten_deep`
//!   ├── collector    Closed set of accumulation strategies for `collect`
//!   ├── executor     Thread-pool backed parallel `map`
//!   ├── source       Line sources (files and readers)
//!   └── error        The shared error taxonomy
//!
//! ```ignore
//! use seqflow::Pipeline;
//!
//! let chunks = Pipeline::range(10).chunk(3)?.to_list();
//! assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]);
//! ```

pub mod collector;
pub mod error;
pub mod executor;
pub mod nested;
pub mod pipeline;
pub mod source;

pub use collector::{Collected, Collector};
pub use error::{PipelineError, Result};
pub use executor::{ConcurrencyConfig, ParallelExecutor, ParallelPipeline, PoolKind, PoolSetting};
pub use nested::Nested;
pub use pipeline::{Cursor, Pipeline};
