use super::common::*;
use crate::matching::domain::{EligibilityCriteria, EligibilityStatus, OpportunityId};
use crate::matching::service::MatchingServiceError;
use chrono::Duration;

#[test]
fn explanation_covers_every_family_with_readable_text() {
    let service = service_with(vec![scholarship("s1")]);

    let explanation = service
        .explain_eligibility_at(&student(), &OpportunityId("s1".to_string()), now())
        .expect("explains");

    assert_eq!(explanation.profile_id.0, "stu-100");
    assert_eq!(explanation.opportunity_id.0, "s1");
    assert_eq!(explanation.status, EligibilityStatus::Eligible);
    assert_eq!(explanation.evaluations.len(), 5);
    assert!(explanation
        .evaluations
        .iter()
        .all(|row| !row.explanation.is_empty()));
    assert_eq!(explanation.generated_at, now());
}

#[test]
fn marginal_rows_are_called_out_in_the_breakdown() {
    let service = service_with(vec![with_criteria(
        "tight-cap",
        EligibilityCriteria {
            max_income: Some(250_000.0),
            ..EligibilityCriteria::default()
        },
    )]);

    let explanation = service
        .explain_eligibility_at(&student(), &OpportunityId("tight-cap".to_string()), now())
        .expect("explains");

    assert_eq!(explanation.status, EligibilityStatus::PartiallyEligible);
    assert!(explanation
        .evaluations
        .iter()
        .any(|row| row.marginal && row.explanation.contains("marginal")));
}

#[test]
fn failing_rows_name_the_violated_bound() {
    let service = service_with(vec![with_criteria(
        "young-only",
        EligibilityCriteria {
            max_age: Some(20),
            ..EligibilityCriteria::default()
        },
    )]);

    let explanation = service
        .explain_eligibility_at(&student(), &OpportunityId("young-only".to_string()), now())
        .expect("explains");

    assert_eq!(explanation.status, EligibilityStatus::NotEligible);
    let age_row = &explanation.evaluations[0];
    assert!(!age_row.satisfied);
    assert!(age_row.explanation.contains("exceeds maximum age 20"));
}

#[test]
fn unknown_opportunity_is_reported() {
    let service = service_with(vec![scholarship("s1")]);

    let err = service
        .explain_eligibility_at(&student(), &OpportunityId("missing".to_string()), now())
        .expect_err("unknown id must fail");

    assert!(matches!(
        err,
        MatchingServiceError::UnknownOpportunity(id) if id == "missing"
    ));
}

#[test]
fn expired_opportunity_cannot_be_explained() {
    let mut expired = scholarship("gone");
    expired.deadline = now() - Duration::days(1);
    let service = service_with(vec![expired]);

    let err = service
        .explain_eligibility_at(&student(), &OpportunityId("gone".to_string()), now())
        .expect_err("expired listing must fail");

    assert!(matches!(err, MatchingServiceError::Inadmissible(_)));
}
