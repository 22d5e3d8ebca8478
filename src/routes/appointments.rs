use super::{error_response, required_field, validation_response, FieldErrors};
use crate::{
    app_state::AppState,
    domain::{
        AppointmentDate, NewAppointment, PhoneNumber, RequesterName, TimeSlot, VisitLocation,
    },
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
    Router::new().route("/appointments", post(book_appointment))
}

#[tracing::instrument(name = "Booking an appointment", skip(app_state, body))]
async fn book_appointment(
    State(app_state): State<AppState>,
    Json(body): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, BookingError> {
    let appointment = parse_booking(body)?;

    let appointment_id = insert_appointment(&app_state.db_pool, &appointment)
        .await
        .map_err(BookingError::Persistence)?;

    // Write before notify: a failed email never rolls back the booking.
    let summary = templates::AppointmentSummary {
        name: appointment.name.as_ref(),
        business_name: appointment.business_name.as_ref(),
        contact_number: appointment.contact_number.as_ref(),
        location: appointment.location.as_ref(),
        date: &appointment.date.as_date().to_string(),
        time: &appointment.time.to_string(),
        notes: appointment.notes.as_deref(),
    };
    let outcome = app_state
        .dispatcher
        .notify_admin(&templates::appointment_booked(&summary))
        .await;

    Ok(Json(BookingResponse {
        success: true,
        appointment_id,
        admin_notification_sent: outcome.sent,
    }))
}

fn parse_booking(body: BookingRequest) -> Result<NewAppointment, BookingError> {
    let mut fields = FieldErrors::new();
    let today = OffsetDateTime::now_utc().date();

    let name = required_field(&mut fields, "name", body.name, RequesterName::parse);
    let business_name = required_field(
        &mut fields,
        "businessName",
        body.business_name,
        RequesterName::parse,
    );
    let contact_number = required_field(
        &mut fields,
        "contactNumber",
        body.contact_number,
        PhoneNumber::parse,
    );
    let location = required_field(&mut fields, "location", body.location, VisitLocation::parse);
    let date = required_field(&mut fields, "appointmentDate", body.appointment_date, |s| {
        AppointmentDate::parse(&s, today)
    });
    let time = required_field(&mut fields, "appointmentTime", body.appointment_time, |s| {
        TimeSlot::parse(&s)
    });

    match (name, business_name, contact_number, location, date, time) {
        (Some(name), Some(business_name), Some(contact_number), Some(location), Some(date), Some(time))
            if fields.is_empty() =>
        {
            Ok(NewAppointment {
                name,
                business_name,
                contact_number,
                location,
                date,
                time,
                notes: body.notes.filter(|notes| !notes.trim().is_empty()),
            })
        }
        _ => Err(BookingError::Validation(fields)),
    }
}

#[tracing::instrument(name = "Saving a new appointment", skip(db_pool, appointment))]
async fn insert_appointment(
    db_pool: &PgPool,
    appointment: &NewAppointment,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO appointments \
            (id, name, business_name, contact_number, location, \
             appointment_date, appointment_time, notes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(appointment.name.as_ref())
    .bind(appointment.business_name.as_ref())
    .bind(appointment.contact_number.as_ref())
    .bind(appointment.location.as_ref())
    .bind(appointment.date.as_date())
    .bind(appointment.time.as_ref())
    .bind(appointment.notes.as_deref())
    .bind(OffsetDateTime::now_utc())
    .execute(db_pool)
    .await?;

    Ok(id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingRequest {
    name: Option<String>,
    business_name: Option<String>,
    contact_number: Option<String>,
    location: Option<String>,
    appointment_date: Option<String>,
    appointment_time: Option<String>,
    notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingResponse {
    success: bool,
    appointment_id: Uuid,
    admin_notification_sent: bool,
}

#[derive(Debug, thiserror::Error)]
enum BookingError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Failed to save the appointment")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue scheduling your appointment. Please try again.",
            ),
        }
    }
}
