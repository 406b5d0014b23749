//! Catalog/sales-history read boundary.

use cartwise_core::TenantId;

use crate::sink::PersistenceError;

/// Supplies per-product engine inputs for a tenant.
///
/// The orchestrator treats this as a pure data source; real
/// implementations live in the storage/API layer, not here.
pub trait ContextProvider<I>: Send + Sync {
    fn load(&self, tenant_id: TenantId) -> Result<Vec<I>, PersistenceError>;
}

/// Fixed in-memory provider for tests/dev.
#[derive(Debug, Clone)]
pub struct StaticProvider<I> {
    items: Vec<I>,
}

impl<I> StaticProvider<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self { items }
    }
}

impl<I: Clone + Send + Sync> ContextProvider<I> for StaticProvider<I> {
    fn load(&self, _tenant_id: TenantId) -> Result<Vec<I>, PersistenceError> {
        Ok(self.items.clone())
    }
}
