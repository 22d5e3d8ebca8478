use super::error_response;
use crate::{
    address_client::AddressSuggestion,
    app_state::AppState,
    domain::StructuredAddress,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addresses/suggestions", get(suggestions))
        .route("/addresses/resolve", get(resolve))
}

/// Suggestion lookups degrade rather than fail: any provider trouble is
/// logged and answered with an empty list, and the caller's form keeps
/// working on free-text input flagged as unverified.
#[tracing::instrument(name = "Fetching address suggestions", skip(app_state, params))]
async fn suggestions(
    State(app_state): State<AppState>,
    Query(params): Query<SuggestionsQuery>,
) -> Json<SuggestionsResponse> {
    let suggestions = match app_state
        .address_client
        .suggestions(&params.query, params.country.as_deref())
        .await
    {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::warn!(
                error_cause_chain = ?e,
                error.message = %e,
                "Address provider unavailable. Suggestions suppressed."
            );
            Vec::new()
        }
    };

    Json(SuggestionsResponse { suggestions })
}

#[tracing::instrument(name = "Resolving a structured address", skip(app_state, params))]
async fn resolve(
    State(app_state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ResolveError> {
    match app_state.address_client.resolve(&params.place_id).await {
        Ok(Some(address)) => Ok(Json(ResolveResponse { address })),
        Ok(None) => Err(ResolveError::UnknownPlace),
        Err(e) => Err(ResolveError::Provider(e)),
    }
}

#[derive(Deserialize)]
struct SuggestionsQuery {
    query: String,
    country: Option<String>,
}

#[derive(Serialize)]
struct SuggestionsResponse {
    suggestions: Vec<AddressSuggestion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveQuery {
    place_id: String,
}

#[derive(Serialize)]
struct ResolveResponse {
    address: StructuredAddress,
}

#[derive(Debug, thiserror::Error)]
enum ResolveError {
    #[error("Unknown place id")]
    UnknownPlace,
    #[error("Address provider call failed")]
    Provider(#[source] reqwest::Error),
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::UnknownPlace => error_response(StatusCode::NOT_FOUND, "Unknown place id"),
            Self::Provider(_) => {
                error_response(StatusCode::BAD_GATEWAY, "Address provider unavailable")
            }
        }
    }
}
