use super::{
    donations::{request_origin, CheckoutRedirect},
    error_response, required_field, validation_response, FieldErrors,
};
use crate::{
    app_state::AppState,
    domain::{DonationAmount, EmailAddress, Order, OrderStatus},
    payment_client::NewCheckoutSession,
    product_catalog,
    storage_client::DownloadLink,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// How long after purchase the downloads stay reachable.
const DOWNLOAD_WINDOW_DAYS: i64 = 30;

/// Lifetime of each individual signed URL.
const SIGNED_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/verify", post(verify_payment))
}

#[tracing::instrument(name = "Creating a product checkout session", skip(app_state, headers, body))]
async fn create_payment(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePaymentRequest>,
) -> Result<Json<CheckoutRedirect>, CreatePaymentError> {
    let origin = request_origin(&headers).map_err(|_| CreatePaymentError::MissingOrigin)?;
    let (product_name, amount, customer_email) = parse_payment(body, &app_state)?;

    let session = app_state
        .payment_client
        .create_session(NewCheckoutSession {
            customer_email: customer_email.as_ref(),
            product_name: &product_name,
            product_description: &format!("Digital download: {product_name}"),
            unit_amount_cents: amount.as_cents(),
            success_url: format!("{origin}/shop?success=true&session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/shop?canceled=true"),
            metadata: vec![
                ("type", "digital_product".to_string()),
                ("product_name", product_name.clone()),
            ],
        })
        .await
        .map_err(CreatePaymentError::Provider)?;

    // The session exists either way; a failed order write leaves a session
    // with no order behind, which verification later reports as not found.
    if let Err(e) = insert_pending_order(
        &app_state.db_pool,
        &customer_email,
        &product_name,
        amount,
        &session.id,
    )
    .await
    {
        tracing::error!(
            error_cause_chain = ?e,
            session_id = %session.id,
            "Failed to create the order record. Continuing with the session."
        );
    }

    let url = session.url.ok_or(CreatePaymentError::MissingRedirect)?;

    tracing::info!(session_id = %session.id, "Payment session created");

    Ok(Json(CheckoutRedirect { url }))
}

#[tracing::instrument(name = "Verifying a payment", skip(app_state, body))]
async fn verify_payment(
    State(app_state): State<AppState>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, VerifyPaymentError> {
    let session_id = match body.session_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(VerifyPaymentError::MissingSessionId),
    };

    let session = app_state
        .payment_client
        .get_session(&session_id)
        .await
        .map_err(VerifyPaymentError::Provider)?;
    if !session.is_paid() {
        return Err(VerifyPaymentError::Incomplete);
    }

    // No idempotency guard: re-verifying a paid session re-runs the update
    // and mints a fresh set of links.
    let order = complete_order(&app_state.db_pool, &session_id)
        .await
        .map_err(VerifyPaymentError::Persistence)?
        .ok_or(VerifyPaymentError::OrderNotFound)?;

    let mut download_urls = Vec::new();
    for object_path in product_catalog::download_paths(&order.product_name) {
        match app_state
            .storage_client
            .create_signed_url(object_path, SIGNED_URL_TTL)
            .await
        {
            Ok(link) => download_urls.push(link),
            Err(e) => {
                tracing::warn!(
                    error_cause_chain = ?e,
                    object_path,
                    "Failed to sign a download URL. Skipping."
                );
            }
        }
    }

    tracing::info!(order_id = %order.id, "Payment verified and order completed");

    Ok(Json(VerifyPaymentResponse {
        success: true,
        order,
        download_urls,
    }))
}

fn parse_payment(
    body: CreatePaymentRequest,
    app_state: &AppState,
) -> Result<(String, DonationAmount, EmailAddress), CreatePaymentError> {
    let mut fields = FieldErrors::new();

    let product_name = required_field(&mut fields, "productName", body.product_name, |s| {
        if s.trim().is_empty() {
            Err("This field is required".to_string())
        } else {
            Ok(s)
        }
    });
    let amount = match body.amount {
        Some(cents) => match DonationAmount::parse(cents) {
            Ok(amount) => Some(amount),
            Err(e) => {
                fields.insert("amount", e);
                None
            }
        },
        None => {
            fields.insert("amount", "This field is required".to_string());
            None
        }
    };

    let customer_email = match body.customer_email {
        Some(email) => match EmailAddress::parse(email) {
            Ok(email) => Some(email),
            Err(e) => {
                fields.insert("customerEmail", e);
                None
            }
        },
        None => Some(app_state.default_customer_email.clone()),
    };

    match (product_name, amount, customer_email) {
        (Some(product_name), Some(amount), Some(customer_email)) if fields.is_empty() => {
            Ok((product_name, amount, customer_email))
        }
        _ => Err(CreatePaymentError::Validation(fields)),
    }
}

#[tracing::instrument(name = "Saving a pending order", skip(db_pool, customer_email, amount))]
async fn insert_pending_order(
    db_pool: &PgPool,
    customer_email: &EmailAddress,
    product_name: &str,
    amount: DonationAmount,
    checkout_session_id: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = OffsetDateTime::now_utc();

    sqlx::query(
        "INSERT INTO orders \
            (id, customer_email, product_name, amount, currency, status, \
             checkout_session_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 'usd', $5, $6, $7, $7)",
    )
    .bind(id)
    .bind(customer_email.as_ref())
    .bind(product_name)
    .bind(amount.as_cents())
    .bind(OrderStatus::Pending.as_ref())
    .bind(checkout_session_id)
    .bind(now)
    .execute(db_pool)
    .await?;

    Ok(id)
}

#[tracing::instrument(name = "Completing an order", skip(db_pool))]
async fn complete_order(
    db_pool: &PgPool,
    checkout_session_id: &str,
) -> Result<Option<Order>, sqlx::Error> {
    let now = OffsetDateTime::now_utc();
    let download_expires_at = now + time::Duration::days(DOWNLOAD_WINDOW_DAYS);

    sqlx::query_as::<_, Order>(
        "UPDATE orders \
         SET status = $2, download_expires_at = $3, updated_at = $4 \
         WHERE checkout_session_id = $1 \
         RETURNING id, customer_email, product_name, amount, currency, status, \
                   checkout_session_id, download_expires_at, created_at, updated_at",
    )
    .bind(checkout_session_id)
    .bind(OrderStatus::Completed.as_ref())
    .bind(download_expires_at)
    .bind(now)
    .fetch_optional(db_pool)
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentRequest {
    product_name: Option<String>,
    amount: Option<i64>,
    customer_email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPaymentRequest {
    session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPaymentResponse {
    success: bool,
    order: Order,
    download_urls: Vec<DownloadLink>,
}

#[derive(Debug, thiserror::Error)]
enum CreatePaymentError {
    #[error("Invalid product or amount")]
    Validation(FieldErrors),
    #[error("Missing Origin header")]
    MissingOrigin,
    #[error("Payment provider call failed")]
    Provider(#[source] reqwest::Error),
    #[error("Payment provider returned no redirect URL")]
    MissingRedirect,
}

impl IntoResponse for CreatePaymentError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Validation(fields) => validation_response(fields),
            Self::MissingOrigin => error_response(StatusCode::BAD_REQUEST, "Missing Origin header"),
            Self::Provider(_) | Self::MissingRedirect => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue starting your purchase. Please try again.",
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum VerifyPaymentError {
    #[error("Session ID is required")]
    MissingSessionId,
    #[error("Payment provider call failed")]
    Provider(#[source] reqwest::Error),
    #[error("Payment not completed")]
    Incomplete,
    #[error("Order not found")]
    OrderNotFound,
    #[error("Failed to update the order")]
    Persistence(#[source] sqlx::Error),
}

impl IntoResponse for VerifyPaymentError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::MissingSessionId => {
                error_response(StatusCode::BAD_REQUEST, "Session ID is required")
            }
            Self::Incomplete => {
                error_response(StatusCode::PAYMENT_REQUIRED, "Payment not completed")
            }
            Self::OrderNotFound => error_response(StatusCode::NOT_FOUND, "Order not found"),
            Self::Provider(_) | Self::Persistence(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, there was an issue verifying your payment. Please try again.",
            ),
        }
    }
}
