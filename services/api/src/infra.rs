use avsar::matching::{
    CatalogError, EngineConfig, Opportunity, OpportunityCatalog, OpportunityId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog backing the service until the opportunity collaborator exposes a
/// shared store. Written to by the CSV import endpoint, read by the engine.
#[derive(Default)]
pub(crate) struct InMemoryOpportunityCatalog {
    records: Mutex<HashMap<OpportunityId, Opportunity>>,
}

impl InMemoryOpportunityCatalog {
    /// Inserts or updates listings, keeping the rest. Returns the new size.
    pub(crate) fn extend(&self, opportunities: Vec<Opportunity>) -> usize {
        let mut guard = self.records.lock().expect("catalog mutex poisoned");
        for opportunity in opportunities {
            guard.insert(opportunity.opportunity_id.clone(), opportunity);
        }
        guard.len()
    }

    /// Swaps the whole catalog for a fresh export. Returns the new size.
    pub(crate) fn replace_all(&self, opportunities: Vec<Opportunity>) -> usize {
        let mut guard = self.records.lock().expect("catalog mutex poisoned");
        guard.clear();
        for opportunity in opportunities {
            guard.insert(opportunity.opportunity_id.clone(), opportunity);
        }
        guard.len()
    }
}

impl OpportunityCatalog for InMemoryOpportunityCatalog {
    fn fetch(&self, id: &OpportunityId) -> Result<Option<Opportunity>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Opportunity>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        let mut all: Vec<_> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.opportunity_id.cmp(&b.opportunity_id));
        Ok(all)
    }
}

pub(crate) fn default_engine_config() -> EngineConfig {
    EngineConfig::default()
}
