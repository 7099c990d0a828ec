use super::config::EngineConfig;

/// Detects near-threshold satisfaction of numeric criteria. Callers apply it
/// only to criteria that are already satisfied; marginal flags never change
/// raw satisfaction, only the partially-eligible classification.
#[derive(Debug, Clone)]
pub struct ThresholdAnalyzer {
    tolerance: f64,
    age_window_years: u8,
    enabled: bool,
}

impl ThresholdAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.marginal_tolerance,
            age_window_years: config.age_marginal_years,
            enabled: config.thresholds_enabled,
        }
    }

    /// Marginal against an upper bound B iff the value is at or above
    /// `(1 - tolerance) * B`.
    pub fn upper_margin(&self, bound: f64, value: f64) -> bool {
        self.enabled && bound > 0.0 && value >= bound * (1.0 - self.tolerance)
    }

    /// Marginal against a lower bound B iff the value is at or below
    /// `(1 + tolerance) * B`.
    pub fn lower_margin(&self, bound: f64, value: f64) -> bool {
        self.enabled && bound > 0.0 && value <= bound * (1.0 + self.tolerance)
    }

    /// Age bounds apply the percentage rule and additionally a whole-year
    /// window, whichever is wider.
    pub fn age_upper_margin(&self, bound: u8, age: u8) -> bool {
        self.enabled
            && (self.upper_margin(f64::from(bound), f64::from(age))
                || age.saturating_add(self.age_window_years) >= bound)
    }

    pub fn age_lower_margin(&self, bound: u8, age: u8) -> bool {
        self.enabled
            && (self.lower_margin(f64::from(bound), f64::from(age))
                || age <= bound.saturating_add(self.age_window_years))
    }

    pub fn tolerance_percent(&self) -> u32 {
        (self.tolerance * 100.0).round() as u32
    }

    pub fn age_window_years(&self) -> u8 {
        self.age_window_years
    }
}
