use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for student profiles owned by the profile collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for catalog opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Education levels on the ordinal scale used by eligibility criteria.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Undergraduate,
    Postgraduate,
    Doctoral,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high school",
            EducationLevel::Undergraduate => "undergraduate",
            EducationLevel::Postgraduate => "postgraduate",
            EducationLevel::Doctoral => "doctoral",
        }
    }
}

/// Reservation category declared on the student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Obc,
    Sc,
    St,
    Ews,
    Other,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::General => "GENERAL",
            Category::Obc => "OBC",
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Ews => "EWS",
            Category::Other => "OTHER",
        }
    }
}

/// Validated student snapshot supplied per matching pass. The engine treats
/// it as immutable for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub profile_id: ProfileId,
    pub date_of_birth: NaiveDate,
    pub state: String,
    pub district: String,
    pub education_level: EducationLevel,
    pub current_degree: Option<String>,
    pub annual_income: f64,
    pub category: Category,
    pub language: String,
}

/// Verification state maintained by the upstream verification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Failed,
    Expired,
}

/// Discriminant for the two opportunity flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    Exam,
    Scholarship,
}

impl OpportunityKind {
    pub const fn label(self) -> &'static str {
        match self {
            OpportunityKind::Exam => "exam",
            OpportunityKind::Scholarship => "scholarship",
        }
    }
}

/// Kind-specific payload carried by an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpportunityDetails {
    Exam {
        syllabus: Option<String>,
        exam_pattern: Option<String>,
    },
    Scholarship {
        award_amount: Option<f64>,
    },
}

impl OpportunityDetails {
    pub const fn kind(&self) -> OpportunityKind {
        match self {
            OpportunityDetails::Exam { .. } => OpportunityKind::Exam,
            OpportunityDetails::Scholarship { .. } => OpportunityKind::Scholarship,
        }
    }
}

/// A verified exam or scholarship listing handed to the engine by the
/// opportunity collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub opportunity_id: OpportunityId,
    pub name: String,
    pub organization: String,
    pub details: OpportunityDetails,
    pub deadline: DateTime<Utc>,
    pub verification: VerificationStatus,
    pub criteria: EligibilityCriteria,
    /// Bumped by the catalog on every edit; part of the evaluation cache key.
    pub version: u32,
}

impl Opportunity {
    pub const fn kind(&self) -> OpportunityKind {
        self.details.kind()
    }

    /// Only verified opportunities with a future deadline are admissible
    /// inputs. Upstream pre-filters; the engine re-checks defensively.
    pub fn is_admissible(&self, now: DateTime<Utc>) -> bool {
        self.verification == VerificationStatus::Verified && self.deadline > now
    }
}

/// Eligibility bounds attached to an opportunity. Any unset field means
/// "no restriction", never "fails".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    /// Reference date for age computation; evaluation date when unset.
    pub age_as_of: Option<NaiveDate>,
    /// Empty means nationwide.
    pub states: Vec<String>,
    pub districts: Vec<String>,
    pub min_education_level: Option<EducationLevel>,
    pub required_degrees: Vec<String>,
    pub max_income: Option<f64>,
    /// Empty means open to all categories.
    pub eligible_categories: Vec<Category>,
    pub additional: Vec<AdditionalCriterion>,
}

/// Closed variant set for criteria outside the five core families. Kinds the
/// engine does not understand arrive as `Unknown` and are skipped with a
/// warning rather than failing the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdditionalCriterion {
    /// Languages the opportunity is conducted in; empty means unrestricted.
    Language { any_of: Vec<String> },
    Unknown { name: String, value: String },
}

/// One of the independently evaluated criterion families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionFamily {
    Age,
    Location,
    Education,
    Income,
    Category,
    Additional,
}

impl CriterionFamily {
    pub const fn label(self) -> &'static str {
        match self {
            CriterionFamily::Age => "age",
            CriterionFamily::Location => "location",
            CriterionFamily::Education => "education",
            CriterionFamily::Income => "income",
            CriterionFamily::Category => "category",
            CriterionFamily::Additional => "additional",
        }
    }
}

/// Decision row for a single criterion, allowing transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaEvaluation {
    pub family: CriterionFamily,
    pub criterion: String,
    pub required: String,
    pub actual: String,
    /// Whether the opportunity actually constrains this family.
    pub restricted: bool,
    pub satisfied: bool,
    pub marginal: bool,
    pub explanation: String,
}

/// Overall eligibility classification for one (profile, opportunity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    PartiallyEligible,
    NotEligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "eligible",
            EligibilityStatus::PartiallyEligible => "partially_eligible",
            EligibilityStatus::NotEligible => "not_eligible",
        }
    }
}

/// Full evaluator output for one pair: status, per-criterion rows, and the
/// relevance score used for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub status: EligibilityStatus,
    pub evaluations: Vec<CriteriaEvaluation>,
    pub relevance_score: f64,
}

impl EligibilityResult {
    pub fn matched_criteria(&self) -> Vec<String> {
        self.evaluations
            .iter()
            .filter(|evaluation| evaluation.satisfied)
            .map(|evaluation| evaluation.criterion.clone())
            .collect()
    }

    pub fn unmatched_criteria(&self) -> Vec<String> {
        self.evaluations
            .iter()
            .filter(|evaluation| !evaluation.satisfied)
            .map(|evaluation| evaluation.criterion.clone())
            .collect()
    }

    pub fn marginal_criteria(&self) -> Vec<String> {
        self.evaluations
            .iter()
            .filter(|evaluation| evaluation.marginal)
            .map(|evaluation| evaluation.criterion.clone())
            .collect()
    }
}

/// Search/listing row: opportunity projection plus eligibility indicators.
/// Produced fresh on every matching pass and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityMatch {
    pub opportunity_id: OpportunityId,
    pub name: String,
    pub organization: String,
    pub kind: OpportunityKind,
    pub deadline: DateTime<Utc>,
    /// Absent when the caller supplied no profile to evaluate against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EligibilityStatus>,
    pub matched_criteria: Vec<String>,
    pub unmatched_criteria: Vec<String>,
    pub marginal_criteria: Vec<String>,
    pub relevance_score: f64,
}

impl OpportunityMatch {
    pub fn from_result(opportunity: &Opportunity, result: &EligibilityResult) -> Self {
        Self {
            opportunity_id: opportunity.opportunity_id.clone(),
            name: opportunity.name.clone(),
            organization: opportunity.organization.clone(),
            kind: opportunity.kind(),
            deadline: opportunity.deadline,
            status: Some(result.status),
            matched_criteria: result.matched_criteria(),
            unmatched_criteria: result.unmatched_criteria(),
            marginal_criteria: result.marginal_criteria(),
            relevance_score: result.relevance_score,
        }
    }

    /// Projection without eligibility indicators, for profile-less search.
    pub fn unevaluated(opportunity: &Opportunity) -> Self {
        Self {
            opportunity_id: opportunity.opportunity_id.clone(),
            name: opportunity.name.clone(),
            organization: opportunity.organization.clone(),
            kind: opportunity.kind(),
            deadline: opportunity.deadline,
            status: None,
            matched_criteria: Vec::new(),
            unmatched_criteria: Vec::new(),
            marginal_criteria: Vec::new(),
            relevance_score: 0.0,
        }
    }
}

/// On-demand eligibility report; generated, delivered, and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityExplanation {
    pub profile_id: ProfileId,
    pub opportunity_id: OpportunityId,
    pub status: EligibilityStatus,
    pub evaluations: Vec<CriteriaEvaluation>,
    pub generated_at: DateTime<Utc>,
}
