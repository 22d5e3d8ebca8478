use crate::{
    app_state::AppState,
    domain::{EmailAddress, Order},
    notifications::templates,
    routes::{error_response, validation_response, FieldErrors},
    storage_client::DownloadLink,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Sending an order confirmation", skip(app_state, body))]
pub(in crate::routes::notifications) async fn send_order_confirmation(
    State(app_state): State<AppState>,
    Json(body): Json<OrderConfirmationRequest>,
) -> Result<Json<OrderConfirmationResponse>, OrderConfirmationError> {
    let order_id = body.order_id.ok_or_else(|| {
        let mut fields = FieldErrors::new();
        fields.insert("orderId", "This field is required".to_string());
        OrderConfirmationError::Validation(fields)
    })?;
    let download_urls = body.download_urls.unwrap_or_default();

    let order = get_order(&app_state.db_pool, order_id)
        .await
        .map_err(OrderConfirmationError::Persistence)?
        .ok_or(OrderConfirmationError::NotFound)?;

    let recipient = EmailAddress::parse(order.customer_email.clone())
        .map_err(OrderConfirmationError::InvalidStoredEmail)?;

    let outcome = app_state
        .dispatcher
        .notify(
            &recipient,
            &templates::order_confirmation(&order, &download_urls),
        )
        .await;

    Ok(Json(OrderConfirmationResponse {
        success: true,
        email_sent: outcome.sent,
    }))
}

#[tracing::instrument(name = "Fetching an order", skip(db_pool))]
async fn get_order(db_pool: &PgPool, order_id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "SELECT id, customer_email, product_name, amount, currency, status, \
                checkout_session_id, download_expires_at, created_at, updated_at \
         FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(db_pool)
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct OrderConfirmationRequest {
    order_id: Option<Uuid>,
    download_urls: Option<Vec<DownloadLink>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::routes::notifications) struct OrderConfirmationResponse {
    success: bool,
    email_sent: bool,
}

#[derive(Debug, thiserror::Error)]
pub(in crate::routes::notifications) enum OrderConfirmationError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Order not found")]
    NotFound,
    #[error("Stored customer email is invalid: {0}")]
    InvalidStoredEmail(String),
    #[error("Failed to fetch the order")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for OrderConfirmationError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::NotFound => error_response(StatusCode::NOT_FOUND, "Order not found"),
            Self::InvalidStoredEmail(_) | Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send the order confirmation",
            ),
        }
    }
}
