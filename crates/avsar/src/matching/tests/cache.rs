use std::cell::Cell;

use super::common::*;
use crate::matching::cache::{profile_fingerprint, EvaluationCache};
use crate::matching::domain::StudentProfile;

#[test]
fn fingerprint_ignores_the_profile_id() {
    let base = student();
    let renamed = StudentProfile {
        profile_id: crate::matching::domain::ProfileId("stu-200".to_string()),
        ..student()
    };

    assert_eq!(profile_fingerprint(&base), profile_fingerprint(&renamed));
}

#[test]
fn fingerprint_tracks_fields_evaluation_depends_on() {
    let base = student();
    let richer = StudentProfile {
        annual_income: 300_000.0,
        ..student()
    };

    assert_ne!(profile_fingerprint(&base), profile_fingerprint(&richer));
}

#[test]
fn fingerprint_is_case_insensitive_for_regions() {
    let base = student();
    let shouty = StudentProfile {
        state: "MAHARASHTRA".to_string(),
        district: "pune".to_string(),
        ..student()
    };

    assert_eq!(profile_fingerprint(&base), profile_fingerprint(&shouty));
}

#[test]
fn repeat_evaluations_are_served_from_the_cache() {
    let cache = EvaluationCache::new(8);
    let evaluator = evaluator();
    let profile = student();
    let opportunity = scholarship("s1");
    let fingerprint = profile_fingerprint(&profile);
    let calls = Cell::new(0u32);

    for _ in 0..3 {
        let result = cache
            .get_or_evaluate(fingerprint, &opportunity, || {
                calls.set(calls.get() + 1);
                evaluator.evaluate(&profile, &opportunity, now())
            })
            .expect("evaluates");
        assert_eq!(result.evaluations.len(), 5);
    }

    assert_eq!(calls.get(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn version_bump_invalidates_cached_entries() {
    let cache = EvaluationCache::new(8);
    let evaluator = evaluator();
    let profile = student();
    let fingerprint = profile_fingerprint(&profile);
    let calls = Cell::new(0u32);

    let mut opportunity = scholarship("s1");
    for version in [1, 2] {
        opportunity.version = version;
        cache
            .get_or_evaluate(fingerprint, &opportunity, || {
                calls.set(calls.get() + 1);
                evaluator.evaluate(&profile, &opportunity, now())
            })
            .expect("evaluates");
    }

    assert_eq!(calls.get(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn profile_edits_miss_the_old_entries() {
    let cache = EvaluationCache::new(8);
    let evaluator = evaluator();
    let opportunity = scholarship("s1");
    let calls = Cell::new(0u32);

    for profile in [student(), student_aged(27)] {
        cache
            .get_or_evaluate(profile_fingerprint(&profile), &opportunity, || {
                calls.set(calls.get() + 1);
                evaluator.evaluate(&profile, &opportunity, now())
            })
            .expect("evaluates");
    }

    assert_eq!(calls.get(), 2);
}

#[test]
fn capacity_overflow_sweeps_the_cache() {
    let cache = EvaluationCache::new(1);
    let evaluator = evaluator();
    let profile = student();
    let fingerprint = profile_fingerprint(&profile);

    for id in ["s1", "s2", "s3"] {
        let opportunity = scholarship(id);
        cache
            .get_or_evaluate(fingerprint, &opportunity, || {
                evaluator.evaluate(&profile, &opportunity, now())
            })
            .expect("evaluates");
    }

    assert_eq!(cache.len(), 1);
}

#[test]
fn evaluation_failures_are_not_cached() {
    let cache = EvaluationCache::new(8);
    let evaluator = evaluator();
    let profile = student();
    let opportunity = scholarship("s1");
    let fingerprint = profile_fingerprint(&profile);

    let err = cache.get_or_evaluate(fingerprint, &opportunity, || {
        Err(crate::matching::evaluation::EvaluationError::InvalidProfile {
            profile_id: profile.profile_id.0.clone(),
            detail: "synthetic failure".to_string(),
        })
    });
    assert!(err.is_err());
    assert_eq!(cache.len(), 0);

    let result = cache
        .get_or_evaluate(fingerprint, &opportunity, || {
            evaluator.evaluate(&profile, &opportunity, now())
        })
        .expect("evaluates after failure");
    assert_eq!(result.evaluations.len(), 5);
}
