use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::OpportunityCatalog;
use super::domain::{Opportunity, OpportunityId, StudentProfile};
use super::ranking::SortMode;
use super::search::{EligibilityMode, SearchQuery};
use super::service::{MatchingService, MatchingServiceError};

/// Router builder exposing the engine's four operations over HTTP.
pub fn matching_router<C>(service: Arc<MatchingService<C>>) -> Router
where
    C: OpportunityCatalog + 'static,
{
    Router::new()
        .route("/api/v1/opportunities/match", post(match_handler::<C>))
        .route(
            "/api/v1/opportunities/:opportunity_id/eligibility",
            post(eligibility_handler::<C>),
        )
        .route(
            "/api/v1/opportunities/:opportunity_id/explanation",
            post(explanation_handler::<C>),
        )
        .route("/api/v1/opportunities/search", post(search_handler::<C>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRequest {
    pub(crate) profile: StudentProfile,
    /// Candidate set; the catalog snapshot is used when omitted.
    #[serde(default)]
    pub(crate) opportunities: Option<Vec<Opportunity>>,
    #[serde(default)]
    pub(crate) sort: Option<SortMode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityRequest {
    pub(crate) profile: StudentProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest {
    #[serde(default)]
    pub(crate) query: SearchQuery,
    #[serde(default)]
    pub(crate) sort: Option<SortMode>,
    #[serde(default)]
    pub(crate) profile: Option<StudentProfile>,
    #[serde(default)]
    pub(crate) opportunities: Option<Vec<Opportunity>>,
    #[serde(default = "default_include_marginal")]
    pub(crate) include_marginal: bool,
}

fn default_include_marginal() -> bool {
    true
}

pub(crate) async fn match_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    C: OpportunityCatalog + 'static,
{
    let opportunities = match resolve_candidates(&service, request.opportunities) {
        Ok(opportunities) => opportunities,
        Err(response) => return response,
    };

    // An explicit sort reuses the search path so the listing honors it.
    let outcome = match request.sort {
        None => service.match_opportunities(&request.profile, &opportunities),
        Some(sort) => service.search_and_rank(
            &opportunities,
            &SearchQuery::default(),
            Some(sort),
            Some(&request.profile),
            EligibilityMode::IncludeMarginal,
        ),
    };

    match outcome {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligibility_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    Path(opportunity_id): Path<String>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    C: OpportunityCatalog + 'static,
{
    let id = OpportunityId(opportunity_id);
    match service.check_eligibility(&request.profile, &id) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn explanation_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    Path(opportunity_id): Path<String>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    C: OpportunityCatalog + 'static,
{
    let id = OpportunityId(opportunity_id);
    match service.explain_eligibility(&request.profile, &id) {
        Ok(explanation) => (StatusCode::OK, axum::Json(explanation)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn search_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    axum::Json(request): axum::Json<SearchRequest>,
) -> Response
where
    C: OpportunityCatalog + 'static,
{
    let opportunities = match resolve_candidates(&service, request.opportunities) {
        Ok(opportunities) => opportunities,
        Err(response) => return response,
    };

    let mode = if request.include_marginal {
        EligibilityMode::IncludeMarginal
    } else {
        EligibilityMode::EligibleOnly
    };

    match service.search_and_rank(
        &opportunities,
        &request.query,
        request.sort,
        request.profile.as_ref(),
        mode,
    ) {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(err) => error_response(err),
    }
}

fn resolve_candidates<C>(
    service: &MatchingService<C>,
    inline: Option<Vec<Opportunity>>,
) -> Result<Vec<Opportunity>, Response>
where
    C: OpportunityCatalog + 'static,
{
    match inline {
        Some(opportunities) => Ok(opportunities),
        None => service.catalog_opportunities().map_err(error_response),
    }
}

fn error_response(err: MatchingServiceError) -> Response {
    let status = match &err {
        MatchingServiceError::UnknownOpportunity(_) => StatusCode::NOT_FOUND,
        MatchingServiceError::Inadmissible(_) | MatchingServiceError::Evaluation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MatchingServiceError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
