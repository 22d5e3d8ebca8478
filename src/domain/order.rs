use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A digital-product purchase. Created `pending` alongside the checkout
/// session; flipped to `completed` by payment verification. Never deleted.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_email: String,
    pub product_name: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub checkout_session_id: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub download_expires_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, PartialEq)]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl AsRef<str> for OrderStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("`{other}` is not a valid variant of OrderStatus",)),
        }
    }
}
