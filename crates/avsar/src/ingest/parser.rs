use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

use super::normalizer::normalize_region;
use super::{CatalogImport, CatalogImportError};
use crate::matching::domain::{
    Category, EducationLevel, EligibilityCriteria, Opportunity, OpportunityDetails, OpportunityId,
    VerificationStatus,
};

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<CatalogImport, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut opportunities = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        match row.into_opportunity() {
            Ok(opportunity) => opportunities.push(opportunity),
            Err(reason) => {
                warn!(%reason, "skipping malformed catalog row");
                skipped += 1;
            }
        }
    }

    Ok(CatalogImport {
        opportunities,
        skipped,
    })
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Organization")]
    organization: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Deadline")]
    deadline: String,
    #[serde(rename = "Verification", default, deserialize_with = "empty_string_as_none")]
    verification: Option<String>,
    #[serde(rename = "Min Age", default)]
    min_age: Option<u8>,
    #[serde(rename = "Max Age", default)]
    max_age: Option<u8>,
    #[serde(rename = "States", default, deserialize_with = "empty_string_as_none")]
    states: Option<String>,
    #[serde(rename = "Districts", default, deserialize_with = "empty_string_as_none")]
    districts: Option<String>,
    #[serde(rename = "Min Education", default, deserialize_with = "empty_string_as_none")]
    min_education: Option<String>,
    #[serde(
        rename = "Required Degrees",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    required_degrees: Option<String>,
    #[serde(rename = "Max Income", default)]
    max_income: Option<f64>,
    #[serde(rename = "Categories", default, deserialize_with = "empty_string_as_none")]
    categories: Option<String>,
    #[serde(rename = "Award Amount", default)]
    award_amount: Option<f64>,
    #[serde(rename = "Syllabus", default, deserialize_with = "empty_string_as_none")]
    syllabus: Option<String>,
    #[serde(rename = "Exam Pattern", default, deserialize_with = "empty_string_as_none")]
    exam_pattern: Option<String>,
    #[serde(rename = "Version", default)]
    version: Option<u32>,
}

impl CatalogRow {
    fn into_opportunity(self) -> Result<Opportunity, String> {
        if self.id.is_empty() {
            return Err("row is missing an opportunity id".to_string());
        }

        let deadline = parse_deadline(&self.deadline)
            .ok_or_else(|| format!("row {}: unparseable deadline '{}'", self.id, self.deadline))?;

        let details = match self.kind.to_ascii_lowercase().as_str() {
            "exam" => OpportunityDetails::Exam {
                syllabus: self.syllabus,
                exam_pattern: self.exam_pattern,
            },
            "scholarship" => OpportunityDetails::Scholarship {
                award_amount: self.award_amount,
            },
            other => return Err(format!("row {}: unknown type '{other}'", self.id)),
        };

        let verification = match self.verification.as_deref() {
            // Catalog exports are pre-filtered to verified listings.
            None => VerificationStatus::Verified,
            Some(value) => parse_verification(value)
                .ok_or_else(|| format!("row {}: unknown verification '{value}'", self.id))?,
        };

        let min_education_level = match self.min_education.as_deref() {
            None => None,
            Some(value) => Some(
                parse_education(value)
                    .ok_or_else(|| format!("row {}: unknown education level '{value}'", self.id))?,
            ),
        };

        let eligible_categories = match self.categories.as_deref() {
            None => Vec::new(),
            Some(value) => parse_categories(value)
                .ok_or_else(|| format!("row {}: unknown category in '{value}'", self.id))?,
        };

        Ok(Opportunity {
            opportunity_id: OpportunityId(self.id),
            name: self.name,
            organization: self.organization,
            details,
            deadline,
            verification,
            criteria: EligibilityCriteria {
                min_age: self.min_age,
                max_age: self.max_age,
                age_as_of: None,
                states: parse_list(self.states.as_deref()),
                districts: parse_list(self.districts.as_deref()),
                min_education_level,
                required_degrees: self
                    .required_degrees
                    .as_deref()
                    .map(split_cell)
                    .unwrap_or_default(),
                max_income: self.max_income,
                eligible_categories,
                additional: Vec::new(),
            },
            version: self.version.unwrap_or(1),
        })
    }
}

fn parse_list(cell: Option<&str>) -> Vec<String> {
    cell.map(|value| {
        split_cell(value)
            .iter()
            .map(|entry| normalize_region(entry))
            .collect()
    })
    .unwrap_or_default()
}

fn split_cell(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // Date-only deadlines mean end of that day.
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
    }

    None
}

fn parse_verification(value: &str) -> Option<VerificationStatus> {
    match value.to_ascii_lowercase().as_str() {
        "verified" => Some(VerificationStatus::Verified),
        "pending" => Some(VerificationStatus::Pending),
        "failed" => Some(VerificationStatus::Failed),
        "expired" => Some(VerificationStatus::Expired),
        _ => None,
    }
}

fn parse_education(value: &str) -> Option<EducationLevel> {
    match value.to_ascii_lowercase().replace(' ', "_").as_str() {
        "high_school" => Some(EducationLevel::HighSchool),
        "undergraduate" => Some(EducationLevel::Undergraduate),
        "postgraduate" => Some(EducationLevel::Postgraduate),
        "doctoral" => Some(EducationLevel::Doctoral),
        _ => None,
    }
}

fn parse_categories(value: &str) -> Option<Vec<Category>> {
    split_cell(value)
        .iter()
        .map(|entry| match entry.to_ascii_lowercase().as_str() {
            "general" => Some(Category::General),
            "obc" => Some(Category::Obc),
            "sc" => Some(Category::Sc),
            "st" => Some(Category::St),
            "ews" => Some(Category::Ews),
            "other" => Some(Category::Other),
            _ => None,
        })
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
