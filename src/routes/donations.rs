use super::{error_response, validation_response, FieldErrors};
use crate::{app_state::AppState, domain::DonationAmount, payment_client::NewCheckoutSession};
use axum::{
    extract::State,
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new().route("/donations", post(create_donation))
}

#[tracing::instrument(name = "Creating a donation checkout session", skip(app_state, headers, body))]
async fn create_donation(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateDonationRequest>,
) -> Result<Json<CheckoutRedirect>, DonationError> {
    let origin = request_origin(&headers)?;

    // Bounds are enforced before the provider is contacted at all.
    let amount = match body.amount {
        Some(cents) => DonationAmount::parse(cents).map_err(|e| {
            let mut fields = FieldErrors::new();
            fields.insert("amount", e);
            DonationError::Validation(fields)
        })?,
        None => {
            let mut fields = FieldErrors::new();
            fields.insert("amount", "This field is required".to_string());
            return Err(DonationError::Validation(fields));
        }
    };

    let session = app_state
        .payment_client
        .create_session(NewCheckoutSession {
            customer_email: app_state.default_customer_email.as_ref(),
            product_name: "Donation to Maple's Therapy Mission",
            product_description:
                "Support therapy visits and bring comfort to those who need it most",
            unit_amount_cents: amount.as_cents(),
            success_url: format!(
                "{origin}/donate?success=true&session_id={{CHECKOUT_SESSION_ID}}"
            ),
            cancel_url: format!("{origin}/donate?canceled=true"),
            metadata: vec![
                ("type", "donation".to_string()),
                ("amount", amount.as_cents().to_string()),
            ],
        })
        .await
        .map_err(DonationError::Provider)?;

    let url = session.url.ok_or(DonationError::MissingRedirect)?;

    tracing::info!(session_id = %session.id, "Donation session created");

    Ok(Json(CheckoutRedirect { url }))
}

pub(crate) fn request_origin(headers: &HeaderMap) -> Result<String, DonationError> {
    headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or(DonationError::MissingOrigin)
}

#[derive(Deserialize)]
struct CreateDonationRequest {
    amount: Option<i64>,
}

#[derive(Serialize)]
pub(crate) struct CheckoutRedirect {
    pub(crate) url: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum DonationError {
    #[error("Invalid donation amount")]
    Validation(FieldErrors),
    #[error("Missing Origin header")]
    MissingOrigin,
    #[error("Payment provider call failed")]
    Provider(#[source] reqwest::Error),
    #[error("Payment provider returned no redirect URL")]
    MissingRedirect,
}

impl IntoResponse for DonationError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::MissingOrigin => error_response(StatusCode::BAD_REQUEST, "Missing Origin header"),
            Self::Provider(_) | Self::MissingRedirect => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue starting your donation. Please try again.",
            ),
        }
    }
}
