use super::{error_response, required_field, validation_response, FieldErrors};
use crate::{app_state::AppState, notifications::templates};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/photos", post(submit_photos))
}

static DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[tracing::instrument(name = "Receiving a photo submission", skip(app_state, body))]
async fn submit_photos(
    State(app_state): State<AppState>,
    Json(body): Json<PhotoSubmissionRequest>,
) -> Result<Json<PhotoSubmissionResponse>, PhotoSubmissionError> {
    let submission = parse_submission(body)?;

    let submission_id = insert_photo_submission(&app_state.db_pool, &submission)
        .await
        .map_err(PhotoSubmissionError::Persistence)?;

    let summary = templates::PhotoSubmissionSummary {
        submission_id: &submission_id.to_string(),
        event_date: &submission.event_date.to_string(),
        photo_count: submission.photo_urls.len(),
        story: submission.story.as_deref(),
        submitter_name: submission.submitter_name.as_deref(),
        submitter_email: submission.submitter_email.as_deref(),
    };
    let outcome = app_state
        .dispatcher
        .notify_admin(&templates::photo_submitted(&summary))
        .await;

    Ok(Json(PhotoSubmissionResponse {
        success: true,
        submission_id,
        admin_notification_sent: outcome.sent,
    }))
}

struct PhotoSubmission {
    photo_urls: Vec<String>,
    event_date: Date,
    story: Option<String>,
    submitter_name: Option<String>,
    submitter_email: Option<String>,
}

fn parse_submission(body: PhotoSubmissionRequest) -> Result<PhotoSubmission, PhotoSubmissionError> {
    let mut fields = FieldErrors::new();

    let photo_urls = match body.photo_urls {
        Some(urls) if !urls.is_empty() => Some(urls),
        _ => {
            fields.insert("photoUrls", "At least one photo is required".to_string());
            None
        }
    };
    let event_date = required_field(&mut fields, "eventDate", body.event_date, |s| {
        Date::parse(&s, DATE_FORMAT)
            .map_err(|_| format!("`{s}` is not a valid date (expected YYYY-MM-DD)"))
    });

    match (photo_urls, event_date) {
        (Some(photo_urls), Some(event_date)) if fields.is_empty() => Ok(PhotoSubmission {
            photo_urls,
            event_date,
            story: body.story,
            submitter_name: body.submitter_name,
            submitter_email: body.submitter_email,
        }),
        _ => Err(PhotoSubmissionError::Validation(fields)),
    }
}

#[tracing::instrument(name = "Saving a photo submission", skip(db_pool, submission))]
async fn insert_photo_submission(
    db_pool: &PgPool,
    submission: &PhotoSubmission,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO photo_submissions \
            (id, photo_urls, event_date, story, submitted_by_name, \
             submitted_by_email, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)",
    )
    .bind(id)
    .bind(&submission.photo_urls)
    .bind(submission.event_date)
    .bind(submission.story.as_deref())
    .bind(submission.submitter_name.as_deref())
    .bind(submission.submitter_email.as_deref())
    .bind(OffsetDateTime::now_utc())
    .execute(db_pool)
    .await?;

    Ok(id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoSubmissionRequest {
    photo_urls: Option<Vec<String>>,
    event_date: Option<String>,
    story: Option<String>,
    submitter_name: Option<String>,
    submitter_email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhotoSubmissionResponse {
    success: bool,
    submission_id: Uuid,
    admin_notification_sent: bool,
}

#[derive(Debug, thiserror::Error)]
enum PhotoSubmissionError {
    #[error("Photo URLs and event date are required")]
    Validation(FieldErrors),
    #[error("Failed to submit photos")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for PhotoSubmissionError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue submitting your photos. Please try again.",
            ),
        }
    }
}
