use crate::infra::{default_engine_config, InMemoryOpportunityCatalog};
use avsar::error::AppError;
use avsar::ingest::OpportunityCsvImporter;
use avsar::matching::{
    Category, EducationLevel, EligibilityCriteria, MatchingService, Opportunity,
    OpportunityDetails, OpportunityId, ProfileId, StudentProfile, VerificationStatus,
};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog CSV export to match against instead of the built-in
    /// sample listings.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Annual household income for the sample profile, in rupees.
    #[arg(long, default_value_t = 240_000.0)]
    pub(crate) annual_income: f64,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let opportunities = match args.catalog_csv {
        Some(path) => {
            let file = File::open(path)?;
            let import = OpportunityCsvImporter::from_reader(file)?;
            if import.skipped > 0 {
                println!("Skipped {} malformed catalog rows", import.skipped);
            }
            import.opportunities
        }
        None => sample_catalog(),
    };

    let catalog = Arc::new(InMemoryOpportunityCatalog::default());
    catalog.extend(opportunities);
    let service = MatchingService::new(catalog, default_engine_config());

    let profile = sample_profile(args.annual_income);
    println!(
        "Matching profile {} ({}, {}, {})",
        profile.profile_id.0,
        profile.state,
        profile.education_level.label(),
        profile.category.label()
    );

    let candidates = service.catalog_opportunities()?;
    let matches = service.match_opportunities(&profile, &candidates)?;

    if matches.is_empty() {
        println!("No eligible opportunities in the catalog.");
        return Ok(());
    }

    println!("\nRanked matches:");
    for (rank, entry) in matches.iter().enumerate() {
        let status = entry
            .status
            .map(|status| status.label())
            .unwrap_or("unevaluated");
        println!(
            "{:>2}. {} [{}] relevance {:.1}, deadline {}",
            rank + 1,
            entry.name,
            status,
            entry.relevance_score,
            entry.deadline.date_naive()
        );
        if !entry.marginal_criteria.is_empty() {
            println!("    marginal on: {}", entry.marginal_criteria.join(", "));
        }
    }

    let top = &matches[0];
    println!("\nWhy '{}' matches:", top.name);
    let explanation = service.explain_eligibility(&profile, &top.opportunity_id)?;
    for row in &explanation.evaluations {
        let mark = if row.satisfied { "+" } else { "-" };
        println!("  {mark} {}: {}", row.criterion, row.explanation);
    }

    Ok(())
}

fn sample_profile(annual_income: f64) -> StudentProfile {
    StudentProfile {
        profile_id: ProfileId("demo-student".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2004, 3, 10).expect("valid date"),
        state: "Maharashtra".to_string(),
        district: "Pune".to_string(),
        education_level: EducationLevel::Undergraduate,
        current_degree: Some("B.Sc".to_string()),
        annual_income,
        category: Category::Obc,
        language: "English".to_string(),
    }
}

fn sample_catalog() -> Vec<Opportunity> {
    let now = Utc::now();
    let scholarship = |id: &str, name: &str, days_out: i64, criteria: EligibilityCriteria| {
        Opportunity {
            opportunity_id: OpportunityId(id.to_string()),
            name: name.to_string(),
            organization: "National Education Trust".to_string(),
            details: OpportunityDetails::Scholarship {
                award_amount: Some(50_000.0),
            },
            deadline: now + Duration::days(days_out),
            verification: VerificationStatus::Verified,
            criteria,
            version: 1,
        }
    };

    vec![
        scholarship(
            "state-merit",
            "State Merit Scholarship",
            21,
            EligibilityCriteria {
                min_age: Some(18),
                max_age: Some(30),
                states: vec!["Maharashtra".to_string()],
                min_education_level: Some(EducationLevel::Undergraduate),
                max_income: Some(500_000.0),
                eligible_categories: vec![Category::Obc, Category::Sc, Category::St],
                ..EligibilityCriteria::default()
            },
        ),
        scholarship(
            "income-support",
            "Income Support Grant",
            10,
            EligibilityCriteria {
                max_income: Some(250_000.0),
                ..EligibilityCriteria::default()
            },
        ),
        scholarship(
            "open-fellowship",
            "Open Fellowship",
            45,
            EligibilityCriteria::default(),
        ),
        scholarship(
            "sc-reserved",
            "Reserved Scholarship",
            30,
            EligibilityCriteria {
                eligible_categories: vec![Category::Sc],
                ..EligibilityCriteria::default()
            },
        ),
    ]
}
