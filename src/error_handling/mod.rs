//! Error types and pipeline statistics.

mod stats;
mod types;

pub use stats::PipelineStats;
pub use types::{FetchError, InitializationError, OutcomeKind, StoreError};
