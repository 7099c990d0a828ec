use chrono::{Datelike, NaiveDate};

use super::super::domain::{
    AdditionalCriterion, Category, CriteriaEvaluation, CriterionFamily, EligibilityCriteria,
    StudentProfile,
};
use super::threshold::ThresholdAnalyzer;

/// Completed age in whole years as of the reference date.
pub(crate) fn age_in_years(date_of_birth: NaiveDate, as_of: NaiveDate) -> u8 {
    if date_of_birth > as_of {
        return 0;
    }
    let mut age = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    u8::try_from(age).unwrap_or(u8::MAX)
}

pub(crate) fn evaluate_age(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
    evaluation_date: NaiveDate,
    analyzer: &ThresholdAnalyzer,
) -> CriteriaEvaluation {
    let as_of = criteria.age_as_of.unwrap_or(evaluation_date);
    let age = age_in_years(profile.date_of_birth, as_of);
    let restricted = criteria.min_age.is_some() || criteria.max_age.is_some();

    if !restricted {
        return CriteriaEvaluation {
            family: CriterionFamily::Age,
            criterion: "age".to_string(),
            required: "none".to_string(),
            actual: age.to_string(),
            restricted: false,
            satisfied: true,
            marginal: false,
            explanation: "No age restriction".to_string(),
        };
    }

    let required = match (criteria.min_age, criteria.max_age) {
        (Some(min), Some(max)) => format!("age between {min} and {max}"),
        (Some(min), None) => format!("minimum age {min}"),
        (None, Some(max)) => format!("maximum age {max}"),
        (None, None) => unreachable!("restricted implies at least one bound"),
    };

    let below = criteria.min_age.map(|min| age < min).unwrap_or(false);
    let above = criteria.max_age.map(|max| age > max).unwrap_or(false);
    let satisfied = !below && !above;

    let marginal = satisfied
        && (criteria
            .max_age
            .map(|max| analyzer.age_upper_margin(max, age))
            .unwrap_or(false)
            || criteria
                .min_age
                .map(|min| analyzer.age_lower_margin(min, age))
                .unwrap_or(false));

    let explanation = if satisfied {
        if marginal {
            format!(
                "Age {age} satisfies {required} (marginal: within {} year(s) of limit)",
                analyzer.age_window_years()
            )
        } else {
            format!("Age {age} satisfies {required}")
        }
    } else if above {
        format!(
            "Age {age} exceeds maximum age {}",
            criteria.max_age.unwrap_or(0)
        )
    } else {
        format!(
            "Age {age} is below minimum age {}",
            criteria.min_age.unwrap_or(0)
        )
    };

    CriteriaEvaluation {
        family: CriterionFamily::Age,
        criterion: "age".to_string(),
        required,
        actual: age.to_string(),
        restricted: true,
        satisfied,
        marginal,
        explanation,
    }
}

pub(crate) fn evaluate_location(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
) -> CriteriaEvaluation {
    let restricted = !criteria.states.is_empty() || !criteria.districts.is_empty();
    let actual = format!("{} / {}", profile.state, profile.district);

    if !restricted {
        return CriteriaEvaluation {
            family: CriterionFamily::Location,
            criterion: "location".to_string(),
            required: "nationwide".to_string(),
            actual,
            restricted: false,
            satisfied: true,
            marginal: false,
            explanation: "Open nationwide".to_string(),
        };
    }

    let state_ok = criteria.states.is_empty()
        || criteria
            .states
            .iter()
            .any(|state| state.eq_ignore_ascii_case(&profile.state));
    let district_ok = criteria.districts.is_empty()
        || criteria
            .districts
            .iter()
            .any(|district| district.eq_ignore_ascii_case(&profile.district));
    let satisfied = state_ok && district_ok;

    let mut required = String::new();
    if !criteria.states.is_empty() {
        required.push_str(&format!("states: {}", criteria.states.join(", ")));
    }
    if !criteria.districts.is_empty() {
        if !required.is_empty() {
            required.push_str("; ");
        }
        required.push_str(&format!("districts: {}", criteria.districts.join(", ")));
    }

    let explanation = if satisfied {
        format!(
            "Location {} ({}) is within the eligible region",
            profile.state, profile.district
        )
    } else {
        format!(
            "Location {} ({}) is outside the eligible region ({required})",
            profile.state, profile.district
        )
    };

    CriteriaEvaluation {
        family: CriterionFamily::Location,
        criterion: "location".to_string(),
        required,
        actual,
        restricted: true,
        satisfied,
        marginal: false,
        explanation,
    }
}

pub(crate) fn evaluate_education(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
) -> CriteriaEvaluation {
    let restricted =
        criteria.min_education_level.is_some() || !criteria.required_degrees.is_empty();
    let actual = match &profile.current_degree {
        Some(degree) => format!("{} ({degree})", profile.education_level.label()),
        None => profile.education_level.label().to_string(),
    };

    if !restricted {
        return CriteriaEvaluation {
            family: CriterionFamily::Education,
            criterion: "education".to_string(),
            required: "none".to_string(),
            actual,
            restricted: false,
            satisfied: true,
            marginal: false,
            explanation: "No education restriction".to_string(),
        };
    }

    let level_ok = criteria
        .min_education_level
        .map(|minimum| profile.education_level >= minimum)
        .unwrap_or(true);
    let degree_ok = criteria.required_degrees.is_empty()
        || profile
            .current_degree
            .as_deref()
            .map(|degree| {
                criteria
                    .required_degrees
                    .iter()
                    .any(|required| required.eq_ignore_ascii_case(degree))
            })
            .unwrap_or(false);
    let satisfied = level_ok && degree_ok;

    let mut required = String::new();
    if let Some(minimum) = criteria.min_education_level {
        required.push_str(&format!("at least {}", minimum.label()));
    }
    if !criteria.required_degrees.is_empty() {
        if !required.is_empty() {
            required.push_str("; ");
        }
        required.push_str(&format!(
            "degree in {}",
            criteria.required_degrees.join(", ")
        ));
    }

    let explanation = if satisfied {
        format!("Education level {} meets the requirement ({required})", actual)
    } else if !level_ok {
        format!(
            "Education level {} is below the required {}",
            profile.education_level.label(),
            criteria
                .min_education_level
                .map(|minimum| minimum.label())
                .unwrap_or("none")
        )
    } else {
        format!(
            "Current degree {} is not among the required degrees ({})",
            profile.current_degree.as_deref().unwrap_or("none"),
            criteria.required_degrees.join(", ")
        )
    };

    CriteriaEvaluation {
        family: CriterionFamily::Education,
        criterion: "education".to_string(),
        required,
        actual,
        restricted: true,
        satisfied,
        marginal: false,
        explanation,
    }
}

pub(crate) fn evaluate_income(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
    analyzer: &ThresholdAnalyzer,
) -> CriteriaEvaluation {
    let actual = format!("{:.0}", profile.annual_income);

    let Some(max_income) = criteria.max_income else {
        return CriteriaEvaluation {
            family: CriterionFamily::Income,
            criterion: "income".to_string(),
            required: "none".to_string(),
            actual,
            restricted: false,
            satisfied: true,
            marginal: false,
            explanation: "No income restriction".to_string(),
        };
    };

    let satisfied = profile.annual_income <= max_income;
    let marginal = satisfied && analyzer.upper_margin(max_income, profile.annual_income);

    let explanation = if satisfied {
        if marginal {
            format!(
                "Annual income {actual} satisfies maximum income {max_income:.0} (marginal: within {}% of limit)",
                analyzer.tolerance_percent()
            )
        } else {
            format!("Annual income {actual} satisfies maximum income {max_income:.0}")
        }
    } else {
        format!("Annual income {actual} exceeds maximum income {max_income:.0}")
    };

    CriteriaEvaluation {
        family: CriterionFamily::Income,
        criterion: "income".to_string(),
        required: format!("annual income at most {max_income:.0}"),
        actual,
        restricted: true,
        satisfied,
        marginal,
        explanation,
    }
}

pub(crate) fn evaluate_category(
    profile: &StudentProfile,
    criteria: &EligibilityCriteria,
) -> CriteriaEvaluation {
    let actual = profile.category.label().to_string();

    if criteria.eligible_categories.is_empty() {
        return CriteriaEvaluation {
            family: CriterionFamily::Category,
            criterion: "category".to_string(),
            required: "all categories".to_string(),
            actual,
            restricted: false,
            satisfied: true,
            marginal: false,
            explanation: "Open to all categories".to_string(),
        };
    }

    let satisfied = criteria.eligible_categories.contains(&profile.category);
    let required = format!("one of {}", category_list(&criteria.eligible_categories));

    let explanation = if satisfied {
        format!("Category {actual} is eligible")
    } else {
        format!(
            "Category {actual} is not among the eligible categories ({})",
            category_list(&criteria.eligible_categories)
        )
    };

    CriteriaEvaluation {
        family: CriterionFamily::Category,
        criterion: "category".to_string(),
        required,
        actual,
        restricted: true,
        satisfied,
        marginal: false,
        explanation,
    }
}

/// Known additional criteria evaluate to one row; unknown kinds return `None`
/// so the evaluator can skip them with a warning.
pub(crate) fn evaluate_additional(
    profile: &StudentProfile,
    criterion: &AdditionalCriterion,
) -> Option<CriteriaEvaluation> {
    match criterion {
        AdditionalCriterion::Language { any_of } => {
            if any_of.is_empty() {
                return Some(CriteriaEvaluation {
                    family: CriterionFamily::Additional,
                    criterion: "language".to_string(),
                    required: "none".to_string(),
                    actual: profile.language.clone(),
                    restricted: false,
                    satisfied: true,
                    marginal: false,
                    explanation: "No language restriction".to_string(),
                });
            }

            let satisfied = any_of
                .iter()
                .any(|language| language.eq_ignore_ascii_case(&profile.language));
            let required = format!("offered in {}", any_of.join(", "));
            let explanation = if satisfied {
                format!("Preferred language {} is offered", profile.language)
            } else {
                format!(
                    "Preferred language {} is not offered ({})",
                    profile.language,
                    any_of.join(", ")
                )
            };

            Some(CriteriaEvaluation {
                family: CriterionFamily::Additional,
                criterion: "language".to_string(),
                required,
                actual: profile.language.clone(),
                restricted: true,
                satisfied,
                marginal: false,
                explanation,
            })
        }
        AdditionalCriterion::Unknown { .. } => None,
    }
}

fn category_list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}
