use serde::{Deserialize, Serialize};

use super::domain::{Category, EducationLevel, EligibilityStatus, Opportunity, OpportunityKind};

/// Query predicates for catalog search. All provided predicates are ANDed;
/// an empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring match against name and organization.
    pub text: Option<String>,
    pub kind: Option<OpportunityKind>,
    pub category: Option<Category>,
    pub state: Option<String>,
    pub education_level: Option<EducationLevel>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.state.is_none()
            && self.education_level.is_none()
    }

    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_name = opportunity.name.to_lowercase().contains(&needle);
            let in_org = opportunity.organization.to_lowercase().contains(&needle);
            if !in_name && !in_org {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if opportunity.kind() != kind {
                return false;
            }
        }

        if let Some(category) = self.category {
            let categories = &opportunity.criteria.eligible_categories;
            if !categories.is_empty() && !categories.contains(&category) {
                return false;
            }
        }

        if let Some(state) = &self.state {
            let states = &opportunity.criteria.states;
            if !states.is_empty()
                && !states.iter().any(|known| known.eq_ignore_ascii_case(state))
            {
                return false;
            }
        }

        if let Some(level) = self.education_level {
            if let Some(minimum) = opportunity.criteria.min_education_level {
                if level < minimum {
                    return false;
                }
            }
        }

        true
    }
}

/// Narrows the candidate set by query predicates. Eligibility filtering is a
/// separate predicate composed after evaluation, never before.
pub fn filter(opportunities: &[Opportunity], query: &SearchQuery) -> Vec<Opportunity> {
    if query.is_empty() {
        return opportunities.to_vec();
    }

    opportunities
        .iter()
        .filter(|opportunity| query.matches(opportunity))
        .cloned()
        .collect()
}

/// Which evaluated statuses survive into search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityMode {
    EligibleOnly,
    IncludeMarginal,
}

impl EligibilityMode {
    pub fn admits(self, status: EligibilityStatus) -> bool {
        match self {
            EligibilityMode::EligibleOnly => status == EligibilityStatus::Eligible,
            EligibilityMode::IncludeMarginal => status != EligibilityStatus::NotEligible,
        }
    }
}
