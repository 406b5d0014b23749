//! Shared calling convention for the numeric engines.

use crate::error::DomainResult;
use crate::id::ProductId;

/// A pure, deterministic decision-support engine.
///
/// Engines are side-effect free: they read their construction-time rate
/// tables, validate the input, and return a fresh result value. They keep
/// no state across invocations, so a single instance may serve arbitrarily
/// many concurrent callers without synchronization.
pub trait Engine: Send + Sync {
    type Input: ProductScoped + Send + Sync;
    type Output: Send;

    /// Stable name used in logs and batch summaries.
    fn name(&self) -> &'static str;

    /// Validate `input` and compute a result.
    ///
    /// Malformed input must be rejected with
    /// [`DomainError::InvalidInput`](crate::DomainError::InvalidInput)
    /// before any arithmetic runs, never silently coerced to NaN or zero.
    fn evaluate(&self, input: &Self::Input) -> DomainResult<Self::Output>;
}

/// Helper trait for product-scoped values.
///
/// Batch infrastructure uses this to tag per-item outcomes without knowing
/// the concrete input or output type.
pub trait ProductScoped {
    fn product_id(&self) -> ProductId;
}
