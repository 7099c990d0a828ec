use super::common::*;
use crate::matching::domain::{
    Category, EducationLevel, EligibilityCriteria, EligibilityStatus, OpportunityKind,
};
use crate::matching::search::{filter, EligibilityMode, SearchQuery};

#[test]
fn empty_query_returns_everything() {
    let pool = vec![scholarship("s1"), exam("e1")];

    let results = filter(&pool, &SearchQuery::default());

    assert_eq!(results.len(), 2);
}

#[test]
fn predicates_are_conjunctive() {
    let pool = vec![
        with_criteria(
            "mh-scholarship",
            EligibilityCriteria {
                states: vec!["Maharashtra".to_string()],
                ..EligibilityCriteria::default()
            },
        ),
        exam("mh-exam"),
        with_criteria(
            "kl-scholarship",
            EligibilityCriteria {
                states: vec!["Kerala".to_string()],
                ..EligibilityCriteria::default()
            },
        ),
        scholarship("nationwide"),
    ];
    let query = SearchQuery {
        kind: Some(OpportunityKind::Scholarship),
        state: Some("Maharashtra".to_string()),
        ..SearchQuery::default()
    };

    let results = filter(&pool, &query);

    let ids: Vec<_> = results
        .iter()
        .map(|opportunity| opportunity.opportunity_id.0.as_str())
        .collect();
    // Nationwide listings pass any state predicate.
    assert_eq!(ids, vec!["mh-scholarship", "nationwide"]);
}

#[test]
fn text_search_covers_name_and_organization() {
    let pool = vec![scholarship("s1"), exam("e1")];

    let by_org = filter(
        &pool,
        &SearchQuery {
            text: Some("education TRUST".to_string()),
            ..SearchQuery::default()
        },
    );
    assert_eq!(by_org.len(), 2);

    let by_name = filter(
        &pool,
        &SearchQuery {
            text: Some("entrance".to_string()),
            ..SearchQuery::default()
        },
    );
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].opportunity_id.0, "e1");
}

#[test]
fn education_filter_excludes_higher_minimums() {
    let pool = vec![
        with_criteria(
            "postgrad-only",
            EligibilityCriteria {
                min_education_level: Some(EducationLevel::Postgraduate),
                ..EligibilityCriteria::default()
            },
        ),
        scholarship("open"),
    ];
    let query = SearchQuery {
        education_level: Some(EducationLevel::Undergraduate),
        ..SearchQuery::default()
    };

    let results = filter(&pool, &query);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].opportunity_id.0, "open");
}

#[test]
fn category_filter_keeps_open_opportunities() {
    let pool = vec![
        with_criteria(
            "obc-reserved",
            EligibilityCriteria {
                eligible_categories: vec![Category::Obc],
                ..EligibilityCriteria::default()
            },
        ),
        scholarship("open"),
    ];
    let query = SearchQuery {
        category: Some(Category::Sc),
        ..SearchQuery::default()
    };

    let results = filter(&pool, &query);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].opportunity_id.0, "open");
}

#[test]
fn eligibility_modes_admit_the_right_statuses() {
    assert!(EligibilityMode::EligibleOnly.admits(EligibilityStatus::Eligible));
    assert!(!EligibilityMode::EligibleOnly.admits(EligibilityStatus::PartiallyEligible));
    assert!(!EligibilityMode::EligibleOnly.admits(EligibilityStatus::NotEligible));

    assert!(EligibilityMode::IncludeMarginal.admits(EligibilityStatus::Eligible));
    assert!(EligibilityMode::IncludeMarginal.admits(EligibilityStatus::PartiallyEligible));
    assert!(!EligibilityMode::IncludeMarginal.admits(EligibilityStatus::NotEligible));
}
