//! `cartwise-batch`
//!
//! **Responsibility:** fan a numeric engine over a product batch and hand
//! the results to persistence.
//!
//! This crate owns everything tenant- and I/O-adjacent that the engines
//! deliberately do not:
//! - tenant scoping for batch execution,
//! - the bounded worker pool,
//! - the persistence sink boundary,
//! - per-item partial-failure reporting (one malformed product never
//!   aborts the batch).

pub mod orchestrator;
pub mod provider;
pub mod sink;

pub use orchestrator::{
    BatchError, BatchItem, BatchItemError, BatchOrchestrator, BatchReport, TenantScope,
};
pub use provider::{ContextProvider, StaticProvider};
pub use sink::{InMemorySink, PersistenceError, RecommendationSink};
