//! # Tricache Core
//!
//! Linear-time vertex cache optimizer for triangulated meshes.
//!
//! Reorders a triangle index list so that a small FIFO post-transform vertex
//! cache sees as much reuse as possible, lowering the Average Cache Miss Ratio
//! (ACMR, misses per triangle) of the submitted order.
//!
//! ## Components
//! - **Record Store**: per-vertex and per-triangle bookkeeping for one run
//! - **Scorer**: vertex and triangle priority heuristic
//! - **Cache Window**: bounded, duplicate-tolerant FIFO of emitted vertices
//! - **Greedy Selector**: picks the next triangle to emit
//! - **Optimizer**: drives construction, priming and the select/emit loop
//! - **Evaluator**: plain FIFO replay for miss counts and ACMR

pub mod acmr;
pub mod config;
pub mod format;
pub mod mesh;
pub mod observer;
pub mod optimizer;
pub mod records;
pub mod score;
pub mod select;
pub mod window;

pub use acmr::{AcmrComparison, compare_orders, compute_acmr, count_misses};
pub use config::{OptimizerConfig, ScoringMode};
pub use mesh::{IndexedMesh, MeshSnapshot};
pub use observer::{Anomaly, LogObserver, NullObserver, OptimizeObserver, Phase, RecordingObserver};
pub use optimizer::{OptimizeOutput, OptimizeStats, VertexCacheOptimizer, optimize_batch};

use thiserror::Error;

/// Optimizer errors
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid input mesh: {0}")]
    InvalidInput(String),

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for optimizer operations
pub type OptimizeResult<T> = Result<T, OptimizeError>;
