use chrono::{DateTime, Utc};

use super::domain::{EligibilityExplanation, Opportunity, StudentProfile};
use super::evaluation::{EligibilityEvaluator, EvaluationError};

/// Builds the on-demand criterion-by-criterion report for one pair.
///
/// The evaluator is re-run rather than served from the batch cache so the
/// report always reflects the entities as handed in, even if either changed
/// since the last matching pass.
pub(crate) fn explain(
    evaluator: &EligibilityEvaluator,
    profile: &StudentProfile,
    opportunity: &Opportunity,
    now: DateTime<Utc>,
) -> Result<EligibilityExplanation, EvaluationError> {
    let result = evaluator.evaluate(profile, opportunity, now)?;

    Ok(EligibilityExplanation {
        profile_id: profile.profile_id.clone(),
        opportunity_id: opportunity.opportunity_id.clone(),
        status: result.status,
        evaluations: result.evaluations,
        generated_at: now,
    })
}
