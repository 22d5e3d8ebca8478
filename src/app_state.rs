use crate::{
    address_client::AddressClient, domain::EmailAddress, notifications::NotificationDispatcher,
    payment_client::PaymentClient, storage_client::StorageClient,
};
use sqlx::PgPool;

/// Everything a request handler needs, constructed once at startup and
/// cloned into each router. No hidden statics; clients live as long as the
/// process does.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub payment_client: PaymentClient,
    pub address_client: AddressClient,
    pub storage_client: StorageClient,
    pub dispatcher: NotificationDispatcher,
    pub base_url: String,
    /// Stand-in buyer identity until checkout collects a real email.
    pub default_customer_email: EmailAddress,
}
