use super::domain::{Opportunity, OpportunityId};

/// Read access to the verified opportunity catalog maintained by the
/// opportunity/verification collaborators. The engine never writes to it.
pub trait OpportunityCatalog: Send + Sync {
    fn fetch(&self, id: &OpportunityId) -> Result<Option<Opportunity>, CatalogError>;
    fn list(&self) -> Result<Vec<Opportunity>, CatalogError>;
}

/// Error raised by catalog implementations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("opportunity catalog unavailable: {0}")]
    Unavailable(String),
}
