use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::cache::{profile_fingerprint, EvaluationCache};
use super::catalog::{CatalogError, OpportunityCatalog};
use super::domain::{
    EligibilityExplanation, EligibilityResult, EligibilityStatus, Opportunity, OpportunityId,
    OpportunityMatch, StudentProfile,
};
use super::evaluation::{EligibilityEvaluator, EngineConfig, EvaluationError};
use super::explanation;
use super::ranking::{Ranker, SortMode};
use super::search::{self, EligibilityMode, SearchQuery};

/// Error raised by the matching service facade.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("opportunity {0} not found in catalog")]
    UnknownOpportunity(String),
    #[error("opportunity {0} is not admissible (unverified or past deadline)")]
    Inadmissible(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Orchestrator composing the evaluator, threshold analyzer, ranker, search
/// filter, and evaluation cache per request. Holds no mutable state beyond
/// the cache; every pass computes fresh results from the snapshots handed in.
pub struct MatchingService<C> {
    catalog: Arc<C>,
    evaluator: EligibilityEvaluator,
    ranker: Ranker,
    cache: EvaluationCache,
}

impl<C> MatchingService<C>
where
    C: OpportunityCatalog + 'static,
{
    pub fn new(catalog: Arc<C>, config: EngineConfig) -> Self {
        let evaluator = EligibilityEvaluator::new(&config);
        let ranker = Ranker::new(config.deadline_decay);
        let cache = EvaluationCache::new(config.cache_capacity);

        Self {
            catalog,
            evaluator,
            ranker,
            cache,
        }
    }

    /// Evaluates every candidate, keeps eligible and partially eligible
    /// matches, and ranks them with the default listing policy.
    pub fn match_opportunities(
        &self,
        profile: &StudentProfile,
        opportunities: &[Opportunity],
    ) -> Result<Vec<OpportunityMatch>, MatchingServiceError> {
        self.match_opportunities_at(profile, opportunities, Utc::now())
    }

    pub fn match_opportunities_at(
        &self,
        profile: &StudentProfile,
        opportunities: &[Opportunity],
        now: DateTime<Utc>,
    ) -> Result<Vec<OpportunityMatch>, MatchingServiceError> {
        self.evaluator.validate_profile(profile, now.date_naive())?;

        let fingerprint = profile_fingerprint(profile);
        let mut matches = Vec::new();

        for opportunity in opportunities {
            if !opportunity.is_admissible(now) {
                warn!(
                    opportunity_id = %opportunity.opportunity_id.0,
                    verification = ?opportunity.verification,
                    deadline = %opportunity.deadline,
                    "excluding inadmissible opportunity from matching pass"
                );
                continue;
            }

            let result = match self.cache.get_or_evaluate(fingerprint, opportunity, || {
                self.evaluator.evaluate(profile, opportunity, now)
            }) {
                Ok(result) => result,
                Err(err) => {
                    // One bad listing must not abort the batch.
                    warn!(
                        opportunity_id = %opportunity.opportunity_id.0,
                        error = %err,
                        "excluding opportunity after evaluation failure"
                    );
                    continue;
                }
            };

            if result.status == EligibilityStatus::NotEligible {
                continue;
            }

            matches.push(OpportunityMatch::from_result(opportunity, &result));
        }

        Ok(self.ranker.rank(matches, None, now))
    }

    /// Single-pair shortcut built directly on the evaluator, no ranking.
    pub fn check_eligibility(
        &self,
        profile: &StudentProfile,
        opportunity_id: &OpportunityId,
    ) -> Result<EligibilityResult, MatchingServiceError> {
        self.check_eligibility_at(profile, opportunity_id, Utc::now())
    }

    pub fn check_eligibility_at(
        &self,
        profile: &StudentProfile,
        opportunity_id: &OpportunityId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityResult, MatchingServiceError> {
        let opportunity = self.admissible_opportunity(opportunity_id, now)?;
        let fingerprint = profile_fingerprint(profile);
        let result = self.cache.get_or_evaluate(fingerprint, &opportunity, || {
            self.evaluator.evaluate(profile, &opportunity, now)
        })?;
        Ok((*result).clone())
    }

    /// On-demand report; always re-evaluates instead of reading the cache so
    /// the breakdown reflects the current entities.
    pub fn explain_eligibility(
        &self,
        profile: &StudentProfile,
        opportunity_id: &OpportunityId,
    ) -> Result<EligibilityExplanation, MatchingServiceError> {
        self.explain_eligibility_at(profile, opportunity_id, Utc::now())
    }

    pub fn explain_eligibility_at(
        &self,
        profile: &StudentProfile,
        opportunity_id: &OpportunityId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityExplanation, MatchingServiceError> {
        let opportunity = self.admissible_opportunity(opportunity_id, now)?;
        let explanation = explanation::explain(&self.evaluator, profile, &opportunity, now)?;
        Ok(explanation)
    }

    /// Applies query predicates, then (when a profile is supplied) composes
    /// eligibility as one more predicate, then ranks. Without a profile the
    /// results carry no eligibility indicators.
    pub fn search_and_rank(
        &self,
        opportunities: &[Opportunity],
        query: &SearchQuery,
        sort: Option<SortMode>,
        profile: Option<&StudentProfile>,
        mode: EligibilityMode,
    ) -> Result<Vec<OpportunityMatch>, MatchingServiceError> {
        self.search_and_rank_at(opportunities, query, sort, profile, mode, Utc::now())
    }

    pub fn search_and_rank_at(
        &self,
        opportunities: &[Opportunity],
        query: &SearchQuery,
        sort: Option<SortMode>,
        profile: Option<&StudentProfile>,
        mode: EligibilityMode,
        now: DateTime<Utc>,
    ) -> Result<Vec<OpportunityMatch>, MatchingServiceError> {
        let pool = search::filter(opportunities, query);
        let mut matches = Vec::new();

        match profile {
            Some(profile) => {
                self.evaluator.validate_profile(profile, now.date_naive())?;
                let fingerprint = profile_fingerprint(profile);

                for opportunity in &pool {
                    if !opportunity.is_admissible(now) {
                        warn!(
                            opportunity_id = %opportunity.opportunity_id.0,
                            "excluding inadmissible opportunity from search results"
                        );
                        continue;
                    }

                    let result = match self.cache.get_or_evaluate(fingerprint, opportunity, || {
                        self.evaluator.evaluate(profile, opportunity, now)
                    }) {
                        Ok(result) => result,
                        Err(err) => {
                            warn!(
                                opportunity_id = %opportunity.opportunity_id.0,
                                error = %err,
                                "excluding opportunity after evaluation failure"
                            );
                            continue;
                        }
                    };

                    if !mode.admits(result.status) {
                        continue;
                    }

                    matches.push(OpportunityMatch::from_result(opportunity, &result));
                }
            }
            None => {
                for opportunity in &pool {
                    if !opportunity.is_admissible(now) {
                        warn!(
                            opportunity_id = %opportunity.opportunity_id.0,
                            "excluding inadmissible opportunity from search results"
                        );
                        continue;
                    }
                    matches.push(OpportunityMatch::unevaluated(opportunity));
                }
            }
        }

        Ok(self.ranker.rank(matches, sort, now))
    }

    /// Catalog snapshot for callers that did not supply candidates inline.
    pub fn catalog_opportunities(&self) -> Result<Vec<Opportunity>, MatchingServiceError> {
        Ok(self.catalog.list()?)
    }

    fn admissible_opportunity(
        &self,
        opportunity_id: &OpportunityId,
        now: DateTime<Utc>,
    ) -> Result<Opportunity, MatchingServiceError> {
        let opportunity = self
            .catalog
            .fetch(opportunity_id)?
            .ok_or_else(|| MatchingServiceError::UnknownOpportunity(opportunity_id.0.clone()))?;

        if !opportunity.is_admissible(now) {
            warn!(
                opportunity_id = %opportunity.opportunity_id.0,
                verification = ?opportunity.verification,
                deadline = %opportunity.deadline,
                "rejecting single-pair request for inadmissible opportunity"
            );
            return Err(MatchingServiceError::Inadmissible(
                opportunity_id.0.clone(),
            ));
        }

        Ok(opportunity)
    }
}
