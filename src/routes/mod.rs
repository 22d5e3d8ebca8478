use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;

pub mod addresses;
pub mod appointments;
pub mod contact;
pub mod donations;
pub mod health_check;
pub mod newsletters;
pub mod notifications;
pub mod payments;
pub mod photos;
pub mod subscriptions;

/// Field-indexed validation messages, surfaced verbatim to the caller.
pub(crate) type FieldErrors = BTreeMap<&'static str, String>;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub(crate) fn validation_response(fields: FieldErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Validation failed", "fields": fields })),
    )
        .into_response()
}

/// Runs `parse` on a required field, recording the failure (or the absence
/// of the field) under its name.
pub(crate) fn required_field<T>(
    fields: &mut FieldErrors,
    field: &'static str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, String>,
) -> Option<T> {
    match value {
        None => {
            fields.insert(field, "This field is required".to_string());
            None
        }
        Some(value) => match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                fields.insert(field, e);
                None
            }
        },
    }
}
