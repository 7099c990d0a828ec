use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::OpportunityMatch;

/// Explicit sort orders callers can request. Absent an explicit mode the
/// ranker applies the default listing policy combining relevance and
/// deadline proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    Deadline,
    Relevance,
    Alphabetical,
}

/// Orders match lists. All orderings are stable and total; the final
/// tiebreak is always the opportunity id, so identical snapshots produce
/// byte-identical output.
#[derive(Debug, Clone)]
pub struct Ranker {
    deadline_decay: f64,
}

impl Ranker {
    pub fn new(deadline_decay: f64) -> Self {
        Self { deadline_decay }
    }

    pub fn rank(
        &self,
        mut matches: Vec<OpportunityMatch>,
        sort: Option<SortMode>,
        now: DateTime<Utc>,
    ) -> Vec<OpportunityMatch> {
        match sort {
            None => {
                matches.sort_by(|a, b| {
                    self.composite_key(b, now)
                        .total_cmp(&self.composite_key(a, now))
                        .then_with(|| a.deadline.cmp(&b.deadline))
                        .then_with(|| a.opportunity_id.cmp(&b.opportunity_id))
                });
            }
            Some(SortMode::Deadline) => {
                matches.sort_by(|a, b| {
                    a.deadline
                        .cmp(&b.deadline)
                        .then_with(|| b.relevance_score.total_cmp(&a.relevance_score))
                        .then_with(|| a.opportunity_id.cmp(&b.opportunity_id))
                });
            }
            Some(SortMode::Relevance) => {
                matches.sort_by(|a, b| {
                    b.relevance_score
                        .total_cmp(&a.relevance_score)
                        .then_with(|| a.deadline.cmp(&b.deadline))
                        .then_with(|| a.opportunity_id.cmp(&b.opportunity_id))
                });
            }
            Some(SortMode::Alphabetical) => {
                matches.sort_by(|a, b| {
                    a.name
                        .to_lowercase()
                        .cmp(&b.name.to_lowercase())
                        .then_with(|| a.opportunity_id.cmp(&b.opportunity_id))
                });
            }
        }

        matches
    }

    /// Default listing key: relevance discounted by deadline distance, so a
    /// slightly weaker match closing sooner can outrank a stronger one that
    /// closes months out.
    fn composite_key(&self, entry: &OpportunityMatch, now: DateTime<Utc>) -> f64 {
        entry.relevance_score - self.deadline_decay * days_until(entry.deadline, now)
    }
}

fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (deadline - now).num_seconds() as f64 / 86_400.0
}
