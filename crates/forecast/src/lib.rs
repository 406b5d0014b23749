//! `cartwise-forecast`
//!
//! **Responsibility:** demand projection for a single product.
//!
//! The engine is pure decision support:
//! - It must not mutate catalog or inventory state.
//! - It emits a forecast value object, not a domain event.
//! - Given the same input and reference date, repeat calls are
//!   bitwise-identical.

pub mod engine;

pub use engine::{
    ExternalFactors, ForecastConfig, ForecastEngine, ForecastInput, ForecastResult, RiskLevel,
};
