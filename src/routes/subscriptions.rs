use super::{error_response, required_field, validation_response, FieldErrors};
use crate::{app_state::AppState, domain::EmailAddress, notifications::templates};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(subscribe))
        .route("/subscriptions/unsubscribe", get(unsubscribe))
}

#[tracing::instrument(name = "Adding a newsletter subscriber", skip(app_state, body))]
async fn subscribe(
    State(app_state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, SignupError> {
    let mut fields = FieldErrors::new();
    let email = required_field(&mut fields, "email", body.email, EmailAddress::parse)
        .ok_or(SignupError::Validation(fields))?;

    let preferences = Preferences {
        newsletter: body.newsletter.unwrap_or(true),
        visit_updates: body.visit_updates.unwrap_or(true),
        donation_updates: body.donation_updates.unwrap_or(false),
        gallery_notifications: body.gallery_notifications.unwrap_or(false),
    };
    let subscriber_id = insert_subscriber(&app_state.db_pool, &email, &preferences)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                SignupError::AlreadySubscribed
            }
            other => SignupError::Persistence(other),
        })?;

    // The confirmation email is best-effort; a delivery failure must not
    // undo the signup.
    let confirmation = templates::newsletter_confirmation(body.name.as_deref());
    let outcome = app_state.dispatcher.notify(&email, &confirmation).await;

    Ok(Json(SignupResponse {
        success: true,
        subscriber_id,
        confirmation_email_sent: outcome.sent,
    }))
}

#[tracing::instrument(name = "Unsubscribing an email address", skip(app_state, params))]
async fn unsubscribe(
    State(app_state): State<AppState>,
    Query(params): Query<UnsubscribeParams>,
) -> Result<Json<UnsubscribeResponse>, SignupError> {
    let email = EmailAddress::parse(params.email).map_err(|e| {
        let mut fields = FieldErrors::new();
        fields.insert("email", e);
        SignupError::Validation(fields)
    })?;

    // Clearing the verification flag takes the address out of every future
    // bulk send; the row itself is kept.
    sqlx::query("UPDATE email_subscribers SET verified = FALSE WHERE email = $1")
        .bind(email.as_ref())
        .execute(&app_state.db_pool)
        .await
        .map_err(SignupError::Persistence)?;

    Ok(Json(UnsubscribeResponse { success: true }))
}

struct Preferences {
    newsletter: bool,
    visit_updates: bool,
    donation_updates: bool,
    gallery_notifications: bool,
}

#[tracing::instrument(name = "Saving a new subscriber", skip(db_pool, email, preferences))]
async fn insert_subscriber(
    db_pool: &PgPool,
    email: &EmailAddress,
    preferences: &Preferences,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO email_subscribers \
            (id, email, subscribed_at, verified, newsletter, visit_updates, \
             donation_updates, gallery_notifications) \
         VALUES ($1, $2, $3, FALSE, $4, $5, $6, $7)",
    )
    .bind(id)
    .bind(email.as_ref())
    .bind(OffsetDateTime::now_utc())
    .bind(preferences.newsletter)
    .bind(preferences.visit_updates)
    .bind(preferences.donation_updates)
    .bind(preferences.gallery_notifications)
    .execute(db_pool)
    .await?;

    Ok(id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    email: Option<String>,
    name: Option<String>,
    newsletter: Option<bool>,
    visit_updates: Option<bool>,
    donation_updates: Option<bool>,
    gallery_notifications: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupResponse {
    success: bool,
    subscriber_id: Uuid,
    confirmation_email_sent: bool,
}

#[derive(Deserialize)]
struct UnsubscribeParams {
    email: String,
}

#[derive(Serialize)]
struct UnsubscribeResponse {
    success: bool,
}

#[derive(Debug, thiserror::Error)]
enum SignupError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("This email is already subscribed")]
    AlreadySubscribed,
    #[error("Failed to save the subscription")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::AlreadySubscribed => {
                error_response(StatusCode::CONFLICT, "This email is already subscribed")
            }
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue processing your signup. Please try again.",
            ),
        }
    }
}
