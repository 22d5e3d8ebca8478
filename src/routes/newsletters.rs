use super::{error_response, required_field, validation_response, FieldErrors};
use crate::{
    app_state::AppState,
    domain::{EmailAddress, NewsletterStatus},
    notifications::templates,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/newsletters/send", post(send_newsletter))
}

#[tracing::instrument(name = "Sending a newsletter issue", skip(app_state, body))]
async fn send_newsletter(
    State(app_state): State<AppState>,
    Json(body): Json<SendNewsletterRequest>,
) -> Result<Json<SendNewsletterResponse>, SendNewsletterError> {
    let (newsletter_id, title, content) = parse_request(body)?;

    let subscribers = get_verified_subscribers(&app_state.db_pool)
        .await
        .map_err(SendNewsletterError::Persistence)?;
    if subscribers.is_empty() {
        return Err(SendNewsletterError::NoVerifiedSubscribers);
    }

    let total_subscribers = subscribers.len();
    let issue = templates::newsletter_issue(&title, &content, &app_state.base_url);

    let mut sent_count = 0;
    let mut failed_count = 0;

    // One recipient at a time; an individual failure is logged and counted,
    // never allowed to abort the run.
    for subscriber_email in subscribers {
        match EmailAddress::parse(subscriber_email.clone()) {
            Ok(recipient) => {
                let personalized = issue.personalize(recipient.as_ref());
                match app_state.dispatcher.send(&recipient, &personalized).await {
                    Ok(message_id) => {
                        sent_count += 1;
                        record_delivery(
                            &app_state.db_pool,
                            &subscriber_email,
                            &title,
                            DeliveryOutcome::Sent { message_id },
                        )
                        .await;
                        touch_last_notification(&app_state.db_pool, &subscriber_email).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            error_cause_chain = ?e,
                            error.message = %e,
                            subscriber_email = %subscriber_email,
                            "Failed to deliver the issue to a verified subscriber. Skipping."
                        );
                        failed_count += 1;
                        record_delivery(
                            &app_state.db_pool,
                            &subscriber_email,
                            &title,
                            DeliveryOutcome::Failed {
                                error: e.to_string(),
                            },
                        )
                        .await;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    error_cause_chain = ?e,
                    subscriber_email = %subscriber_email,
                    "Skipping a verified subscriber. Their stored email is invalid."
                );
                failed_count += 1;
                record_delivery(
                    &app_state.db_pool,
                    &subscriber_email,
                    &title,
                    DeliveryOutcome::Failed { error: e },
                )
                .await;
            }
        }
    }

    mark_newsletter_sent(&app_state.db_pool, newsletter_id, sent_count).await;

    Ok(Json(SendNewsletterResponse {
        success: true,
        sent_count,
        failed_count,
        total_subscribers,
    }))
}

fn parse_request(
    body: SendNewsletterRequest,
) -> Result<(Uuid, String, String), SendNewsletterError> {
    let mut fields = FieldErrors::new();

    let non_empty = |s: String| {
        if s.trim().is_empty() {
            Err("This field is required".to_string())
        } else {
            Ok(s)
        }
    };

    let newsletter_id = match body.newsletter_id {
        Some(id) => Some(id),
        None => {
            fields.insert("newsletterId", "This field is required".to_string());
            None
        }
    };
    let title = required_field(&mut fields, "title", body.title, non_empty);
    let content = required_field(&mut fields, "content", body.content, non_empty);

    match (newsletter_id, title, content) {
        (Some(id), Some(title), Some(content)) if fields.is_empty() => Ok((id, title, content)),
        _ => Err(SendNewsletterError::Validation(fields)),
    }
}

#[tracing::instrument(name = "Getting verified subscribers", skip(db_pool))]
async fn get_verified_subscribers(db_pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT email FROM email_subscribers WHERE verified = TRUE ORDER BY subscribed_at",
    )
    .fetch_all(db_pool)
    .await
}

enum DeliveryOutcome {
    Sent { message_id: String },
    Failed { error: String },
}

/// Appends one row to the delivery log. Log-write failures are reported and
/// swallowed so bookkeeping can never break the send loop.
#[tracing::instrument(name = "Recording a delivery outcome", skip(db_pool, subject, outcome))]
async fn record_delivery(
    db_pool: &PgPool,
    subscriber_email: &str,
    subject: &str,
    outcome: DeliveryOutcome,
) {
    let (status, message_id, error) = match outcome {
        DeliveryOutcome::Sent { message_id } => ("sent", Some(message_id), None),
        DeliveryOutcome::Failed { error } => ("failed", None, Some(error)),
    };

    let result = sqlx::query(
        "INSERT INTO notification_logs \
            (id, subscriber_email, notification_type, subject, delivery_status, \
             provider_message_id, error_message, created_at) \
         VALUES ($1, $2, 'newsletter', $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(subscriber_email)
    .bind(subject)
    .bind(status)
    .bind(message_id)
    .bind(error)
    .bind(OffsetDateTime::now_utc())
    .execute(db_pool)
    .await;

    if let Err(e) = result {
        tracing::warn!(
            error_cause_chain = ?e,
            subscriber_email = %subscriber_email,
            "Failed to record a delivery log row"
        );
    }
}

#[tracing::instrument(name = "Stamping last notification time", skip(db_pool))]
async fn touch_last_notification(db_pool: &PgPool, subscriber_email: &str) {
    let result =
        sqlx::query("UPDATE email_subscribers SET last_notification_sent = $1 WHERE email = $2")
            .bind(OffsetDateTime::now_utc())
            .bind(subscriber_email)
            .execute(db_pool)
            .await;

    if let Err(e) = result {
        tracing::warn!(
            error_cause_chain = ?e,
            subscriber_email = %subscriber_email,
            "Failed to stamp last_notification_sent"
        );
    }
}

/// The one edge of the newsletter state machine: draft becomes sent, once,
/// after the loop has finished, however many individual sends failed.
#[tracing::instrument(name = "Marking the newsletter as sent", skip(db_pool))]
async fn mark_newsletter_sent(db_pool: &PgPool, newsletter_id: Uuid, sent_count: usize) {
    let result = sqlx::query(
        "UPDATE newsletters SET status = $1, sent_at = $2, sent_to_count = $3 WHERE id = $4",
    )
    .bind(NewsletterStatus::Sent.as_ref())
    .bind(OffsetDateTime::now_utc())
    .bind(sent_count as i32)
    .bind(newsletter_id)
    .execute(db_pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            tracing::warn!(%newsletter_id, "No newsletter record matched the send request");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(
                error_cause_chain = ?e,
                %newsletter_id,
                "Failed to update the newsletter record after sending"
            );
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendNewsletterRequest {
    newsletter_id: Option<Uuid>,
    title: Option<String>,
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNewsletterResponse {
    success: bool,
    sent_count: usize,
    failed_count: usize,
    total_subscribers: usize,
}

#[derive(Debug, thiserror::Error)]
enum SendNewsletterError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("No verified subscribers found")]
    NoVerifiedSubscribers,
    #[error("Failed to fetch subscribers")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for SendNewsletterError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::NoVerifiedSubscribers => {
                error_response(StatusCode::BAD_REQUEST, "No verified subscribers found")
            }
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send the newsletter. Please try again.",
            ),
        }
    }
}
