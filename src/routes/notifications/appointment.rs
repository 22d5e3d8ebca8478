use crate::{
    app_state::AppState,
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
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

#[tracing::instrument(name = "Re-sending an appointment notification", skip(app_state, body))]
pub(in crate::routes::notifications) async fn send_appointment_notification(
    State(app_state): State<AppState>,
    Json(body): Json<AppointmentNotificationRequest>,
) -> Result<Json<AppointmentNotificationResponse>, AppointmentNotificationError> {
    let appointment_id = body
        .appointment_id
        .ok_or_else(|| {
            let mut fields = FieldErrors::new();
            fields.insert("appointmentId", "This field is required".to_string());
            AppointmentNotificationError::Validation(fields)
        })?;

    let appointment = get_appointment(&app_state.db_pool, appointment_id)
        .await
        .map_err(AppointmentNotificationError::Persistence)?
        .ok_or(AppointmentNotificationError::NotFound)?;

    let summary = templates::AppointmentSummary {
        name: &appointment.name,
        business_name: &appointment.business_name,
        contact_number: &appointment.contact_number,
        location: &appointment.location,
        date: &appointment.appointment_date.to_string(),
        time: &appointment.appointment_time,
        notes: appointment.notes.as_deref(),
    };
    let admin_outcome = app_state
        .dispatcher
        .notify_admin(&templates::appointment_booked(&summary))
        .await;

    // TODO: collect a customer email on the booking form so a confirmation
    // can actually be sent when sendCustomerConfirmation is set.
    if body.send_customer_confirmation {
        tracing::info!(
            %appointment_id,
            "Customer confirmation requested, but appointments carry no customer email"
        );
    }

    Ok(Json(AppointmentNotificationResponse {
        success: true,
        admin_notification_sent: admin_outcome.sent,
        customer_confirmation_sent: false,
    }))
}

#[derive(sqlx::FromRow)]
struct AppointmentRecord {
    name: String,
    business_name: String,
    contact_number: String,
    location: String,
    appointment_date: Date,
    appointment_time: String,
    notes: Option<String>,
}

#[tracing::instrument(name = "Fetching an appointment", skip(db_pool))]
async fn get_appointment(
    db_pool: &PgPool,
    appointment_id: Uuid,
) -> Result<Option<AppointmentRecord>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRecord>(
        "SELECT name, business_name, contact_number, location, \
                appointment_date, appointment_time, notes \
         FROM appointments WHERE id = $1",
    )
    .bind(appointment_id)
    .fetch_optional(db_pool)
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct AppointmentNotificationRequest {
    appointment_id: Option<Uuid>,
    #[serde(default)]
    send_customer_confirmation: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct AppointmentNotificationResponse {
    success: bool,
    admin_notification_sent: bool,
    customer_confirmation_sent: bool,
}

#[derive(Debug, thiserror::Error)]
pub(in crate::routes::notifications) enum AppointmentNotificationError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Appointment not found")]
    NotFound,
    #[error("Failed to fetch the appointment")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for AppointmentNotificationError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::NotFound => error_response(StatusCode::NOT_FOUND, "Appointment not found"),
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send the appointment notification",
            ),
        }
    }
}
