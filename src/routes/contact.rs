use super::{error_response, required_field, validation_response, FieldErrors};
use crate::{
    app_state::AppState,
    domain::{EmailAddress, StructuredAddress},
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
    Router::new().route("/contact", post(submit_contact_form))
}

#[tracing::instrument(name = "Receiving a contact form submission", skip(app_state, body))]
async fn submit_contact_form(
    State(app_state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ContactError> {
    let submission = parse_submission(body)?;

    insert_contact_submission(&app_state.db_pool, &submission)
        .await
        .map_err(ContactError::Persistence)?;

    let summary = templates::ContactSummary {
        first_name: &submission.first_name,
        last_name: &submission.last_name,
        email: submission.email.as_ref(),
        phone: submission.phone.as_deref(),
        organization: submission.organization.as_deref(),
        address: submission.address.as_deref(),
        subject: &submission.subject,
        message: &submission.message,
    };
    let admin_outcome = app_state
        .dispatcher
        .notify_admin(&templates::contact_received(&summary))
        .await;
    let customer_outcome = app_state
        .dispatcher
        .notify(
            &submission.email,
            &templates::contact_confirmation(
                &submission.first_name,
                &submission.subject,
                &submission.message,
            ),
        )
        .await;

    Ok(Json(ContactResponse {
        success: true,
        admin_notification_sent: admin_outcome.sent,
        customer_confirmation_sent: customer_outcome.sent,
    }))
}

struct ContactSubmission {
    first_name: String,
    last_name: String,
    email: EmailAddress,
    phone: Option<String>,
    organization: Option<String>,
    address: Option<String>,
    subject: String,
    message: String,
    structured_address: Option<StructuredAddress>,
    coordinates: Option<String>,
}

fn parse_submission(body: ContactRequest) -> Result<ContactSubmission, ContactError> {
    let mut fields = FieldErrors::new();

    let non_empty = |s: String| {
        if s.trim().is_empty() {
            Err("This field is required".to_string())
        } else {
            Ok(s)
        }
    };

    let first_name = required_field(&mut fields, "firstName", body.first_name, non_empty);
    let last_name = required_field(&mut fields, "lastName", body.last_name, non_empty);
    let email = required_field(&mut fields, "email", body.email, EmailAddress::parse);
    let subject = required_field(&mut fields, "subject", body.subject, non_empty);
    let message = required_field(&mut fields, "message", body.message, non_empty);

    match (first_name, last_name, email, subject, message) {
        (Some(first_name), Some(last_name), Some(email), Some(subject), Some(message))
            if fields.is_empty() =>
        {
            // Coordinates may come in explicitly or ride along with the
            // resolved address; the free-text address always wins for display.
            let coordinates = body.coordinates.or_else(|| {
                body.structured_address
                    .as_ref()
                    .and_then(StructuredAddress::coordinates)
            });

            Ok(ContactSubmission {
                first_name,
                last_name,
                email,
                phone: body.phone,
                organization: body.organization,
                address: body.address,
                subject,
                message,
                structured_address: body.structured_address,
                coordinates,
            })
        }
        _ => Err(ContactError::Validation(fields)),
    }
}

#[tracing::instrument(name = "Saving a contact submission", skip(db_pool, submission))]
async fn insert_contact_submission(
    db_pool: &PgPool,
    submission: &ContactSubmission,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let structured_address = submission
        .structured_address
        .as_ref()
        .map(|address| serde_json::to_value(address).unwrap_or(serde_json::Value::Null));

    sqlx::query(
        "INSERT INTO contact_submissions \
            (id, first_name, last_name, email, phone, organization, address, \
             subject, message, structured_address, coordinates, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(id)
    .bind(&submission.first_name)
    .bind(&submission.last_name)
    .bind(submission.email.as_ref())
    .bind(submission.phone.as_deref())
    .bind(submission.organization.as_deref())
    .bind(submission.address.as_deref())
    .bind(&submission.subject)
    .bind(&submission.message)
    .bind(structured_address)
    .bind(submission.coordinates.as_deref())
    .bind(OffsetDateTime::now_utc())
    .execute(db_pool)
    .await?;

    Ok(id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    organization: Option<String>,
    address: Option<String>,
    subject: Option<String>,
    message: Option<String>,
    // The form sends this one in snake case.
    #[serde(rename = "structured_address")]
    structured_address: Option<StructuredAddress>,
    coordinates: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactResponse {
    success: bool,
    admin_notification_sent: bool,
    customer_confirmation_sent: bool,
}

#[derive(Debug, thiserror::Error)]
enum ContactError {
    #[error("Required fields are missing")]
    Validation(FieldErrors),
    #[error("Failed to save the contact submission")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue sending your message. Please try again.",
            ),
        }
    }
}
