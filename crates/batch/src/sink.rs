//! Persistence boundary for engine outputs.

use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use cartwise_core::TenantId;

/// Failure at the persistence boundary.
///
/// Raised only by sinks, independently per record, and retryable by the
/// caller. The engines never see it; recomputation is never needed to
/// retry a write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("persistence failed: {0}")]
    WriteFailed(String),

    #[error("batch inputs unavailable: {0}")]
    SourceUnavailable(String),
}

impl PersistenceError {
    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }

    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }
}

/// Sink for computed engine results.
///
/// Append semantics: records are tagged with the owning tenant and written
/// once; there is no update-in-place. Outcomes are reported per record so
/// one bad row does not undo rows already written.
pub trait RecommendationSink<T>: Send + Sync {
    fn append(&self, tenant_id: TenantId, records: Vec<T>) -> Vec<Result<(), PersistenceError>>;
}

/// In-memory sink for tests/dev.
#[derive(Debug)]
pub struct InMemorySink<T> {
    inner: Mutex<Vec<(TenantId, T)>>,
}

impl<T> InMemorySink<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> InMemorySink<T> {
    pub fn all(&self) -> Vec<(TenantId, T)> {
        self.inner.lock().unwrap().clone()
    }
}

impl<T: Serialize> InMemorySink<T> {
    /// Export the stored records as a JSON array (debugging aid).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.inner.lock().unwrap())
    }
}

impl<T> Default for InMemorySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> RecommendationSink<T> for InMemorySink<T> {
    fn append(&self, tenant_id: TenantId, records: Vec<T>) -> Vec<Result<(), PersistenceError>> {
        let mut guard = self.inner.lock().unwrap();
        records
            .into_iter()
            .map(|record| {
                guard.push((tenant_id, record));
                Ok(())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sink_appends_with_tenant_tag() {
        let sink = InMemorySink::new();
        let tenant = TenantId::new();

        let outcomes = sink.append(tenant, vec![1u32, 2, 3]);
        assert!(outcomes.iter().all(Result::is_ok));
        assert_eq!(sink.len(), 3);
        assert!(sink.all().iter().all(|(t, _)| *t == tenant));
    }

    #[test]
    fn appends_accumulate_across_batches() {
        let sink = InMemorySink::new();
        sink.append(TenantId::new(), vec!["a"]);
        sink.append(TenantId::new(), vec!["b", "c"]);
        assert_eq!(sink.len(), 3);
    }
}
