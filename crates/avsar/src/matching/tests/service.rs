use super::common::*;
use crate::matching::domain::{
    EligibilityCriteria, EligibilityStatus, OpportunityId, StudentProfile, VerificationStatus,
};
use crate::matching::search::{EligibilityMode, SearchQuery};
use crate::matching::service::MatchingServiceError;
use chrono::{Duration, NaiveDate};

#[test]
fn matching_excludes_unverified_and_expired_listings() {
    let mut pending = scholarship("pending");
    pending.verification = VerificationStatus::Pending;
    let mut expired = scholarship("expired");
    expired.deadline = now() - Duration::days(1);
    let candidates = vec![scholarship("ok"), pending, expired];
    let service = service_with(candidates.clone());

    let matches = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].opportunity_id.0, "ok");
}

#[test]
fn not_eligible_candidates_are_dropped_from_the_listing() {
    let candidates = vec![
        scholarship("open"),
        with_criteria(
            "young-only",
            EligibilityCriteria {
                max_age: Some(20),
                ..EligibilityCriteria::default()
            },
        ),
    ];
    let service = service_with(candidates.clone());

    let matches = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].opportunity_id.0, "open");
    assert_eq!(matches[0].status, Some(EligibilityStatus::Eligible));
}

#[test]
fn partially_eligible_candidates_survive_with_indicators() {
    let candidates = vec![with_criteria(
        "tight-cap",
        EligibilityCriteria {
            max_income: Some(250_000.0),
            ..EligibilityCriteria::default()
        },
    )];
    let service = service_with(candidates.clone());

    let matches = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].status,
        Some(EligibilityStatus::PartiallyEligible)
    );
    assert_eq!(matches[0].marginal_criteria, vec!["income".to_string()]);
    assert!(matches[0].unmatched_criteria.is_empty());
}

#[test]
fn matching_the_same_snapshot_twice_is_byte_identical() {
    let candidates = vec![scholarship("s1"), scholarship("s2"), exam("e1")];
    let service = service_with(candidates.clone());

    let first = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");
    let second = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");

    assert_eq!(first, second);
}

#[test]
fn one_contradictory_listing_does_not_abort_the_batch() {
    let candidates = vec![
        with_criteria(
            "impossible",
            EligibilityCriteria {
                min_age: Some(30),
                max_age: Some(20),
                ..EligibilityCriteria::default()
            },
        ),
        scholarship("good"),
    ];
    let service = service_with(candidates.clone());

    let matches = service
        .match_opportunities_at(&student(), &candidates, now())
        .expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].opportunity_id.0, "good");
}

#[test]
fn invalid_profile_fails_the_whole_pass() {
    let candidates = vec![scholarship("s1")];
    let service = service_with(candidates.clone());
    let profile = StudentProfile {
        date_of_birth: NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
        ..student()
    };

    let err = service
        .match_opportunities_at(&profile, &candidates, now())
        .expect_err("invalid profile must fail");

    assert!(matches!(err, MatchingServiceError::Evaluation(_)));
}

#[test]
fn check_eligibility_rejects_unknown_opportunities() {
    let service = service_with(vec![scholarship("s1")]);

    let err = service
        .check_eligibility_at(&student(), &OpportunityId("missing".to_string()), now())
        .expect_err("unknown id must fail");

    assert!(matches!(
        err,
        MatchingServiceError::UnknownOpportunity(id) if id == "missing"
    ));
}

#[test]
fn check_eligibility_rejects_pending_listings() {
    let mut pending = scholarship("pending");
    pending.verification = VerificationStatus::Pending;
    let service = service_with(vec![pending]);

    let err = service
        .check_eligibility_at(&student(), &OpportunityId("pending".to_string()), now())
        .expect_err("pending listing must fail");

    assert!(matches!(err, MatchingServiceError::Inadmissible(_)));
}

#[test]
fn check_eligibility_returns_the_full_breakdown() {
    let service = service_with(vec![scholarship("s1")]);

    let result = service
        .check_eligibility_at(&student(), &OpportunityId("s1".to_string()), now())
        .expect("checks");

    assert_eq!(result.status, EligibilityStatus::Eligible);
    assert_eq!(result.evaluations.len(), 5);
}

#[test]
fn eligible_only_search_drops_marginal_matches() {
    let candidates = vec![
        scholarship("clean"),
        with_criteria(
            "tight-cap",
            EligibilityCriteria {
                max_income: Some(250_000.0),
                ..EligibilityCriteria::default()
            },
        ),
    ];
    let service = service_with(candidates.clone());

    let strict = service
        .search_and_rank_at(
            &candidates,
            &SearchQuery::default(),
            None,
            Some(&student()),
            EligibilityMode::EligibleOnly,
            now(),
        )
        .expect("searches");
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].opportunity_id.0, "clean");

    let relaxed = service
        .search_and_rank_at(
            &candidates,
            &SearchQuery::default(),
            None,
            Some(&student()),
            EligibilityMode::IncludeMarginal,
            now(),
        )
        .expect("searches");
    assert_eq!(relaxed.len(), 2);
}

#[test]
fn profileless_search_carries_no_eligibility_indicators() {
    let candidates = vec![scholarship("s1"), exam("e1")];
    let service = service_with(candidates.clone());

    let results = service
        .search_and_rank_at(
            &candidates,
            &SearchQuery::default(),
            None,
            None,
            EligibilityMode::IncludeMarginal,
            now(),
        )
        .expect("searches");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|entry| entry.status.is_none()));
    assert!(results.iter().all(|entry| entry.matched_criteria.is_empty()));
}

#[test]
fn catalog_snapshot_backs_requests_without_inline_candidates() {
    let service = service_with(vec![scholarship("s1"), scholarship("s2")]);

    let snapshot = service.catalog_opportunities().expect("lists");

    assert_eq!(snapshot.len(), 2);
}
