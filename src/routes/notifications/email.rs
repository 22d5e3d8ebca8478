use crate::{
    app_state::AppState,
    domain::EmailAddress,
    notifications::templates,
    routes::{error_response, validation_response, FieldErrors},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[tracing::instrument(name = "Sending a notification email", skip(app_state, body))]
pub(in crate::routes::notifications) async fn send_notification_email(
    State(app_state): State<AppState>,
    Json(body): Json<NotificationEmailRequest>,
) -> Result<Json<NotificationEmailResponse>, NotificationEmailError> {
    let mut fields = FieldErrors::new();
    let recipient = match body.email {
        Some(email) => match EmailAddress::parse(email) {
            Ok(email) => Some(email),
            Err(e) => {
                fields.insert("email", e);
                None
            }
        },
        None => {
            fields.insert("email", "This field is required".to_string());
            None
        }
    };
    let recipient = match recipient {
        Some(recipient) if fields.is_empty() => recipient,
        _ => return Err(NotificationEmailError::Validation(fields)),
    };

    let name = body.name.as_deref();
    let email = match body.kind.as_deref() {
        Some("welcome") => templates::welcome(name),
        Some("newsletter_confirmation") => templates::newsletter_confirmation(name),
        Some(other) => {
            return Err(NotificationEmailError::UnknownKind(other.to_string()));
        }
        None => {
            return Err(NotificationEmailError::UnknownKind("<missing>".to_string()));
        }
    };

    // Unlike the form pipelines, this endpoint's whole job is the delivery,
    // so a provider failure is surfaced to the caller.
    let id = app_state
        .dispatcher
        .send(&recipient, &email)
        .await
        .map_err(NotificationEmailError::Delivery)?;

    Ok(Json(NotificationEmailResponse { success: true, id }))
}

#[derive(Deserialize)]
pub(in crate::routes::notifications) struct NotificationEmailRequest {
    email: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Serialize)]
pub(in crate::routes::notifications) struct NotificationEmailResponse {
    success: bool,
    id: String,
}

#[derive(Debug, thiserror::Error)]
pub(in crate::routes::notifications) enum NotificationEmailError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Unknown email type: {0}")]
    UnknownKind(String),
    #[error("Failed to send the notification email")]
    Delivery(#[source] reqwest::Error),
}

impl IntoResponse for NotificationEmailError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::UnknownKind(kind) => error_response(
                StatusCode::BAD_REQUEST,
                format!("Unknown email type: {kind}"),
            ),
            Self::Delivery(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send the notification email",
            ),
        }
    }
}
