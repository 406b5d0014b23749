//! `cartwise-pricing`
//!
//! **Responsibility:** price recommendation for a single product.
//!
//! The engine is pure decision support: it never mutates catalog state and
//! never performs I/O. Every rule that fires appends a structured entry to
//! the recommendation's reasoning trail, in application order, so the
//! decision can be replayed for audit.

pub mod engine;

pub use engine::{
    ExpectedImpact, MarketPosition, PriceAdjustment, PricingConfig, PricingEngine, PricingInput,
    PricingRecommendation, PricingRule,
};
