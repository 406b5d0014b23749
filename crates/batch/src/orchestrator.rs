//! Batch fan-out over the numeric engines.

use std::sync::mpsc;
use std::thread;

use thiserror::Error;
use tracing::{info, warn};

use cartwise_core::{DomainError, Engine, ProductId, ProductScoped, TenantId};

use crate::provider::ContextProvider;
use crate::sink::{PersistenceError, RecommendationSink};

/// Tenant scope for batch execution.
///
/// - `Any`: accept batches for any tenant (shared worker).
/// - `Tenant`: only accept batches for the given tenant (single-tenant
///   worker, defense in depth).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    Any,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }
}

/// Per-item failure in a batch run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BatchItemError {
    /// The engine rejected this item's input; the rest of the batch is
    /// unaffected.
    #[error(transparent)]
    Engine(#[from] DomainError),

    /// The item computed fine but its record failed to persist; the write
    /// is retryable without recomputation.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Batch-level failure: nothing ran at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BatchError {
    #[error(transparent)]
    Scope(#[from] DomainError),

    #[error("failed to load batch inputs: {0}")]
    Load(#[from] PersistenceError),
}

/// Outcome for one product in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem<T> {
    pub product_id: ProductId,
    pub outcome: Result<T, BatchItemError>,
}

/// Result of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    pub tenant_id: TenantId,
    /// Per-item outcomes, in input order.
    pub items: Vec<BatchItem<T>>,
    /// Records accepted by the sink.
    pub persisted: usize,
}

impl<T> BatchReport<T> {
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|item| item.outcome.as_ref().ok())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    pub fn invalid_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, Err(BatchItemError::Engine(_))))
            .count()
    }

    pub fn sink_failure_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, Err(BatchItemError::Persistence(_))))
            .count()
    }
}

/// Maps an engine over a product batch and hands the successes to a sink.
///
/// Items are independent (the engines share no mutable state), so they run
/// on a bounded worker pool. The single persistence write happens only
/// after every item has finished, success or per-item failure; per-record
/// write failures are folded back into the item outcomes.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    scope: TenantScope,
    workers: usize,
}

impl BatchOrchestrator {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope, workers: 4 }
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self::new(TenantScope::Tenant(tenant_id))
    }

    /// Bound the worker pool (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run `engine` over `inputs` for `tenant_id`, then persist the
    /// successes through `sink` in one append.
    pub fn run<E, S>(
        &self,
        engine: &E,
        tenant_id: TenantId,
        inputs: Vec<E::Input>,
        sink: &S,
    ) -> Result<BatchReport<E::Output>, DomainError>
    where
        E: Engine,
        E::Output: Clone,
        S: RecommendationSink<E::Output>,
    {
        if !self.scope.allows(tenant_id) {
            return Err(DomainError::invalid_input(
                "tenant scope violation (batch tenant not allowed by orchestrator)",
            ));
        }

        let total = inputs.len();
        let mut items = self.evaluate_all(engine, inputs);

        // One append for the whole batch, only after every item finished.
        let computed: Vec<(usize, E::Output)> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| item.outcome.as_ref().ok().map(|out| (idx, out.clone())))
            .collect();

        let mut persisted = 0;
        if !computed.is_empty() {
            let records: Vec<E::Output> = computed.iter().map(|(_, out)| out.clone()).collect();
            let writes = sink.append(tenant_id, records);
            for ((idx, _), write) in computed.iter().zip(writes) {
                match write {
                    Ok(()) => persisted += 1,
                    Err(e) => {
                        warn!(
                            engine = engine.name(),
                            tenant = %tenant_id,
                            product = %items[*idx].product_id,
                            error = %e,
                            "record failed to persist"
                        );
                        items[*idx].outcome = Err(BatchItemError::Persistence(e));
                    }
                }
            }
        }

        let invalid = items
            .iter()
            .filter(|item| matches!(item.outcome, Err(BatchItemError::Engine(_))))
            .count();
        info!(
            engine = engine.name(),
            tenant = %tenant_id,
            total,
            computed = total - invalid,
            invalid,
            persisted,
            "batch run finished"
        );

        Ok(BatchReport {
            tenant_id,
            items,
            persisted,
        })
    }

    /// Load the tenant's product contexts from `provider`, then
    /// [`run`](Self::run).
    pub fn run_from<E, P, S>(
        &self,
        engine: &E,
        tenant_id: TenantId,
        provider: &P,
        sink: &S,
    ) -> Result<BatchReport<E::Output>, BatchError>
    where
        E: Engine,
        E::Output: Clone,
        P: ContextProvider<E::Input>,
        S: RecommendationSink<E::Output>,
    {
        let inputs = provider.load(tenant_id)?;
        self.run(engine, tenant_id, inputs, sink).map_err(BatchError::from)
    }

    /// Fan the engine over the inputs on a bounded worker pool and return
    /// per-item outcomes in input order.
    fn evaluate_all<E>(&self, engine: &E, inputs: Vec<E::Input>) -> Vec<BatchItem<E::Output>>
    where
        E: Engine,
    {
        if inputs.is_empty() {
            return Vec::new();
        }

        let jobs: Vec<(usize, E::Input)> = inputs.into_iter().enumerate().collect();
        let workers = self.workers.min(jobs.len());
        let chunk_size = jobs.len().div_ceil(workers);

        let (tx, rx) = mpsc::channel();
        let mut collected: Vec<(usize, BatchItem<E::Output>)> = Vec::with_capacity(jobs.len());

        thread::scope(|s| {
            for chunk in jobs.chunks(chunk_size) {
                let tx = tx.clone();
                s.spawn(move || {
                    for (idx, input) in chunk {
                        let item = BatchItem {
                            product_id: input.product_id(),
                            outcome: engine.evaluate(input).map_err(BatchItemError::from),
                        };
                        // Receiver outlives the scope; a send can only fail
                        // if the whole run is being torn down.
                        let _ = tx.send((*idx, item));
                    }
                });
            }
            drop(tx);

            for pair in rx {
                collected.push(pair);
            }
        });

        collected.sort_by_key(|(idx, _)| *idx);
        collected.into_iter().map(|(_, item)| item).collect()
    }
}
