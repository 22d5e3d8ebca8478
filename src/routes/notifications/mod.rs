use crate::app_state::AppState;
use axum::{routing::post, Router};

mod appointment;
mod donation;
mod email;
mod order;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/appointment",
            post(appointment::send_appointment_notification),
        )
        .route(
            "/notifications/donation",
            post(donation::send_donation_confirmation),
        )
        .route("/notifications/email", post(email::send_notification_email))
        .route("/notifications/order", post(order::send_order_confirmation))
}
