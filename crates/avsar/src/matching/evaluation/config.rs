use serde::{Deserialize, Serialize};

/// Tunables for the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of a numeric bound within which a satisfied criterion is
    /// flagged marginal (0.10 = within 10% of the threshold).
    pub marginal_tolerance: f64,
    /// Marginal window for age bounds, in whole years.
    pub age_marginal_years: u8,
    /// Relevance penalty per day until deadline in the default listing order.
    pub deadline_decay: f64,
    /// When false the engine runs in binary mode: marginal detection is off
    /// and results are only ever eligible or not eligible.
    pub thresholds_enabled: bool,
    /// Upper bound on retained evaluation cache entries.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            marginal_tolerance: 0.10,
            age_marginal_years: 1,
            deadline_decay: 0.5,
            thresholds_enabled: true,
            cache_capacity: 4096,
        }
    }
}

impl EngineConfig {
    /// Binary MVP mode: eligible/not-eligible only.
    pub fn binary() -> Self {
        Self {
            thresholds_enabled: false,
            ..Self::default()
        }
    }
}
