mod config;
pub(crate) mod rules;
mod threshold;

pub use config::EngineConfig;
pub use threshold::ThresholdAnalyzer;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::domain::{
    CriteriaEvaluation, EligibilityResult, EligibilityStatus, Opportunity, StudentProfile,
};

/// Errors the evaluator can raise for a single (profile, opportunity) pair.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("profile {profile_id} cannot be evaluated: {detail}")]
    InvalidProfile { profile_id: String, detail: String },
    #[error("opportunity {opportunity_id} carries contradictory criteria: {detail}")]
    ContradictoryCriteria {
        opportunity_id: String,
        detail: String,
    },
}

/// Stateless evaluator applying the five criterion families plus any known
/// additional criteria to one profile/opportunity pair.
pub struct EligibilityEvaluator {
    analyzer: ThresholdAnalyzer,
}

impl EligibilityEvaluator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            analyzer: ThresholdAnalyzer::from_config(config),
        }
    }

    /// Checks the profile fields evaluation depends on. Upstream validates
    /// profiles fully; this only guards what would corrupt a computation.
    pub fn validate_profile(
        &self,
        profile: &StudentProfile,
        evaluation_date: NaiveDate,
    ) -> Result<(), EvaluationError> {
        if profile.date_of_birth > evaluation_date {
            return Err(EvaluationError::InvalidProfile {
                profile_id: profile.profile_id.0.clone(),
                detail: format!("date of birth {} is in the future", profile.date_of_birth),
            });
        }
        if !profile.annual_income.is_finite() || profile.annual_income < 0.0 {
            return Err(EvaluationError::InvalidProfile {
                profile_id: profile.profile_id.0.clone(),
                detail: "annual income must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }

    fn validate_criteria(&self, opportunity: &Opportunity) -> Result<(), EvaluationError> {
        let criteria = &opportunity.criteria;
        if let (Some(min), Some(max)) = (criteria.min_age, criteria.max_age) {
            if min > max {
                return Err(EvaluationError::ContradictoryCriteria {
                    opportunity_id: opportunity.opportunity_id.0.clone(),
                    detail: format!("minimum age {min} exceeds maximum age {max}"),
                });
            }
        }
        if let Some(max_income) = criteria.max_income {
            if !max_income.is_finite() || max_income < 0.0 {
                return Err(EvaluationError::ContradictoryCriteria {
                    opportunity_id: opportunity.opportunity_id.0.clone(),
                    detail: "maximum income must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Evaluates every criterion family independently and classifies the
    /// pair. Each family yields exactly one row even when unrestricted, so
    /// explanations stay complete.
    pub fn evaluate(
        &self,
        profile: &StudentProfile,
        opportunity: &Opportunity,
        now: DateTime<Utc>,
    ) -> Result<EligibilityResult, EvaluationError> {
        let evaluation_date = now.date_naive();
        self.validate_profile(profile, evaluation_date)?;
        self.validate_criteria(opportunity)?;

        let criteria = &opportunity.criteria;
        let mut evaluations = vec![
            rules::evaluate_age(profile, criteria, evaluation_date, &self.analyzer),
            rules::evaluate_location(profile, criteria),
            rules::evaluate_education(profile, criteria),
            rules::evaluate_income(profile, criteria, &self.analyzer),
            rules::evaluate_category(profile, criteria),
        ];

        for criterion in &criteria.additional {
            match rules::evaluate_additional(profile, criterion) {
                Some(evaluation) => evaluations.push(evaluation),
                None => warn!(
                    opportunity_id = %opportunity.opportunity_id.0,
                    ?criterion,
                    "skipping unrecognized additional criterion"
                ),
            }
        }

        let status = classify(&evaluations);
        let relevance_score = relevance(&evaluations);

        Ok(EligibilityResult {
            status,
            evaluations,
            relevance_score,
        })
    }
}

fn classify(evaluations: &[CriteriaEvaluation]) -> EligibilityStatus {
    if evaluations.iter().any(|evaluation| !evaluation.satisfied) {
        EligibilityStatus::NotEligible
    } else if evaluations.iter().any(|evaluation| evaluation.marginal) {
        EligibilityStatus::PartiallyEligible
    } else {
        EligibilityStatus::Eligible
    }
}

/// Relevance rewards criteria the opportunity actually restricts: a satisfied
/// restricted criterion scores 1.0 (0.75 when marginal), a trivially
/// satisfied one 0.5, an unsatisfied one 0. Scaled to 0..=100.
fn relevance(evaluations: &[CriteriaEvaluation]) -> f64 {
    if evaluations.is_empty() {
        return 0.0;
    }

    let total: f64 = evaluations
        .iter()
        .map(|evaluation| match (evaluation.satisfied, evaluation.restricted) {
            (false, _) => 0.0,
            (true, false) => 0.5,
            (true, true) if evaluation.marginal => 0.75,
            (true, true) => 1.0,
        })
        .sum();

    100.0 * total / evaluations.len() as f64
}
