use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use super::domain::{EligibilityResult, Opportunity, StudentProfile};
use super::evaluation::EvaluationError;

/// Stable hash of the profile fields evaluation depends on. A profile edit
/// that touches any of them produces a new fingerprint, which structurally
/// invalidates every cached entry for the old one.
pub(crate) fn profile_fingerprint(profile: &StudentProfile) -> u64 {
    let mut hasher = DefaultHasher::new();
    profile.date_of_birth.hash(&mut hasher);
    profile.state.to_lowercase().hash(&mut hasher);
    profile.district.to_lowercase().hash(&mut hasher);
    profile.education_level.hash(&mut hasher);
    profile.current_degree.hash(&mut hasher);
    profile.annual_income.to_bits().hash(&mut hasher);
    profile.category.hash(&mut hasher);
    profile.language.to_lowercase().hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    opportunity_id: String,
    version: u32,
}

/// Keyed evaluation cache. The key carries the profile fingerprint and the
/// opportunity version, so a stale entry can never be served across a
/// profile edit or a catalog update. The compute closure runs under the map
/// lock, which guarantees at-most-one computation per key; evaluations are
/// cheap and bounded.
pub(crate) struct EvaluationCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Arc<EligibilityResult>>>,
}

impl EvaluationCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_evaluate<F>(
        &self,
        fingerprint: u64,
        opportunity: &Opportunity,
        compute: F,
    ) -> Result<Arc<EligibilityResult>, EvaluationError>
    where
        F: FnOnce() -> Result<EligibilityResult, EvaluationError>,
    {
        let key = CacheKey {
            fingerprint,
            opportunity_id: opportunity.opportunity_id.0.clone(),
            version: opportunity.version,
        };

        let mut entries = self.entries.lock().expect("evaluation cache mutex poisoned");
        if let Some(result) = entries.get(&key) {
            return Ok(Arc::clone(result));
        }

        let result = Arc::new(compute()?);
        if entries.len() >= self.capacity {
            // Full sweep; superseded keys can never be looked up again anyway.
            entries.clear();
        }
        entries.insert(key, Arc::clone(&result));
        Ok(result)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("evaluation cache mutex poisoned")
            .len()
    }
}
