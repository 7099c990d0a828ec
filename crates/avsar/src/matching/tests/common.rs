use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::matching::catalog::{CatalogError, OpportunityCatalog};
use crate::matching::domain::{
    Category, EducationLevel, EligibilityCriteria, Opportunity, OpportunityDetails, OpportunityId,
    ProfileId, StudentProfile, VerificationStatus,
};
use crate::matching::evaluation::{EligibilityEvaluator, EngineConfig};
use crate::matching::service::MatchingService;

/// Fixed evaluation instant so age and deadline arithmetic stays stable.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig::default()
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(&engine_config())
}

/// Undergraduate from Pune, age 22 as of the fixed instant.
pub(super) fn student() -> StudentProfile {
    StudentProfile {
        profile_id: ProfileId("stu-100".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2004, 3, 10).expect("valid date"),
        state: "Maharashtra".to_string(),
        district: "Pune".to_string(),
        education_level: EducationLevel::Undergraduate,
        current_degree: Some("B.Sc".to_string()),
        annual_income: 240_000.0,
        category: Category::Obc,
        language: "English".to_string(),
    }
}

pub(super) fn student_aged(age: u8) -> StudentProfile {
    StudentProfile {
        date_of_birth: NaiveDate::from_ymd_opt(2026 - i32::from(age), 1, 15)
            .expect("valid date"),
        ..student()
    }
}

/// Verified scholarship with no restrictions; the far deadline keeps it
/// admissible for router tests that run on the wall clock.
pub(super) fn scholarship(id: &str) -> Opportunity {
    Opportunity {
        opportunity_id: OpportunityId(id.to_string()),
        name: format!("Scholarship {id}"),
        organization: "National Education Trust".to_string(),
        details: OpportunityDetails::Scholarship {
            award_amount: Some(50_000.0),
        },
        deadline: Utc::now() + Duration::days(365),
        verification: VerificationStatus::Verified,
        criteria: EligibilityCriteria::default(),
        version: 1,
    }
}

pub(super) fn exam(id: &str) -> Opportunity {
    Opportunity {
        name: format!("Entrance Exam {id}"),
        details: OpportunityDetails::Exam {
            syllabus: Some("Mathematics, reasoning".to_string()),
            exam_pattern: Some("Objective, 3 hours".to_string()),
        },
        ..scholarship(id)
    }
}

pub(super) fn with_criteria(id: &str, criteria: EligibilityCriteria) -> Opportunity {
    Opportunity {
        criteria,
        ..scholarship(id)
    }
}

pub(super) fn service_with(
    opportunities: Vec<Opportunity>,
) -> MatchingService<MemoryCatalog> {
    MatchingService::new(Arc::new(MemoryCatalog::with(opportunities)), engine_config())
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    records: Mutex<HashMap<OpportunityId, Opportunity>>,
}

impl MemoryCatalog {
    pub(super) fn with(opportunities: Vec<Opportunity>) -> Self {
        let records = opportunities
            .into_iter()
            .map(|opportunity| (opportunity.opportunity_id.clone(), opportunity))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }
}

impl OpportunityCatalog for MemoryCatalog {
    fn fetch(&self, id: &OpportunityId) -> Result<Option<Opportunity>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Opportunity>, CatalogError> {
        let guard = self.records.lock().expect("catalog mutex poisoned");
        let mut all: Vec<_> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.opportunity_id.cmp(&b.opportunity_id));
        Ok(all)
    }
}

pub(super) struct UnavailableCatalog;

impl OpportunityCatalog for UnavailableCatalog {
    fn fetch(&self, _id: &OpportunityId) -> Result<Option<Opportunity>, CatalogError> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Opportunity>, CatalogError> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
