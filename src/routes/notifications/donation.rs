use crate::{
    app_state::AppState,
    domain::EmailAddress,
    notifications::templates,
    routes::{validation_response, FieldErrors},
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[tracing::instrument(name = "Sending donation confirmations", skip(app_state, body))]
pub(in crate::routes::notifications) async fn send_donation_confirmation(
    State(app_state): State<AppState>,
    Json(body): Json<DonationConfirmationRequest>,
) -> Result<Json<DonationConfirmationResponse>, DonationConfirmationError> {
    let mut fields = FieldErrors::new();

    let donor_email = match body.donor_email {
        Some(email) => match EmailAddress::parse(email) {
            Ok(email) => Some(email),
            Err(e) => {
                fields.insert("donorEmail", e);
                None
            }
        },
        None => {
            fields.insert("donorEmail", "This field is required".to_string());
            None
        }
    };
    let amount_cents = match body.amount {
        Some(cents) if cents > 0 => Some(cents),
        Some(_) => {
            fields.insert("amount", "Amount must be positive".to_string());
            None
        }
        None => {
            fields.insert("amount", "This field is required".to_string());
            None
        }
    };

    let (donor_email, amount_cents) = match (donor_email, amount_cents) {
        (Some(email), Some(cents)) if fields.is_empty() => (email, cents),
        _ => return Err(DonationConfirmationError::Validation(fields)),
    };

    let formatted_amount = format!("{}.{:02}", amount_cents / 100, amount_cents % 100);
    let donor_name = body.donor_name.as_deref();
    let now = OffsetDateTime::now_utc();
    let date = now.date().to_string();
    let processed_at = format!(
        "{} {:02}:{:02}:{:02} UTC",
        now.date(),
        now.hour(),
        now.minute(),
        now.second()
    );

    let admin_outcome = app_state
        .dispatcher
        .notify_admin(&templates::donation_received(
            donor_email.as_ref(),
            &formatted_amount,
            donor_name,
            &date,
        ))
        .await;
    let donor_outcome = app_state
        .dispatcher
        .notify(
            &donor_email,
            &templates::donation_thanks(&formatted_amount, donor_name, &processed_at),
        )
        .await;

    Ok(Json(DonationConfirmationResponse {
        success: true,
        admin_notification_sent: admin_outcome.sent,
        customer_confirmation_sent: donor_outcome.sent,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct DonationConfirmationRequest {
    donor_email: Option<String>,
    /// Minor currency units, as recorded by the payment provider.
    amount: Option<i64>,
    donor_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct DonationConfirmationResponse {
    success: bool,
    admin_notification_sent: bool,
    customer_confirmation_sent: bool,
}

#[derive(Debug, thiserror::Error)]
pub(in crate::routes::notifications) enum DonationConfirmationError {
    #[error("Donor email and amount are required")]
    Validation(FieldErrors),
}

impl IntoResponse for DonationConfirmationError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
        }
    }
}
