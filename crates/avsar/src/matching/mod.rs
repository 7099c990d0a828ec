//! Eligibility matching and ranking engine.
//!
//! Evaluation, threshold analysis, explanation, ranking, and search are pure
//! computations over the immutable snapshots handed in per request; the
//! [`MatchingService`] facade composes them and owns the only piece of
//! shared state, a versioned evaluation cache.

pub(crate) mod cache;
pub mod catalog;
pub mod domain;
pub(crate) mod evaluation;
pub(crate) mod explanation;
pub mod ranking;
pub mod router;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, OpportunityCatalog};
pub use domain::{
    AdditionalCriterion, Category, CriteriaEvaluation, CriterionFamily, EducationLevel,
    EligibilityCriteria, EligibilityExplanation, EligibilityResult, EligibilityStatus,
    Opportunity, OpportunityDetails, OpportunityId, OpportunityKind, OpportunityMatch, ProfileId,
    StudentProfile, VerificationStatus,
};
pub use evaluation::{EligibilityEvaluator, EngineConfig, EvaluationError, ThresholdAnalyzer};
pub use ranking::{Ranker, SortMode};
pub use router::matching_router;
pub use search::{filter, EligibilityMode, SearchQuery};
pub use service::{MatchingService, MatchingServiceError};
