use once_cell::sync::Lazy;
use pawprints::{
    configuration::{get_configuration, DatabaseSettings},
    startup::{get_pg_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use reqwest::{Client, Response};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use uuid::Uuid;
use wiremock::{MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    pub email_server: MockServer,
    pub payment_server: MockServer,
    pub address_server: MockServer,
    pub storage_server: MockServer,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.database.database_name = Uuid::new_v4().to_string();
        config.application.port = 0;

        let db_pool = configure_database(&config.database).await;

        let email_server = MockServer::start().await;
        config.email_client.base_url = email_server.uri();
        let payment_server = MockServer::start().await;
        config.payment_client.base_url = payment_server.uri();
        let address_server = MockServer::start().await;
        config.address_client.base_url = address_server.uri();
        let storage_server = MockServer::start().await;
        config.storage_client.base_url = storage_server.uri();

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            db_pool,
            email_server,
            payment_server,
            address_server,
            storage_server,
            client: Client::new(),
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get(&self, endpoint_and_query: &str) -> Response {
        self.client
            .get(self.url(endpoint_and_query))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_json(&self, endpoint: &str, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_json_with_origin(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
        origin: &str,
    ) -> Response {
        self.client
            .post(self.url(endpoint))
            .header("Origin", origin)
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

async fn configure_database(configuration: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = get_pg_connection_pool(configuration);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// A successful transactional-email response carrying a message id.
pub fn email_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "ErrorCode": 0,
        "Message": "OK",
        "MessageID": Uuid::new_v4().to_string(),
    }))
}

/// A checkout-session payload as the payment provider returns it.
pub fn checkout_session(id: &str, payment_status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": id,
        "object": "checkout.session",
        "url": format!("https://checkout.example.com/pay/{id}"),
        "payment_status": payment_status,
    }))
}

pub async fn seed_subscriber(db_pool: &PgPool, email: &str, verified: bool) {
    sqlx::query(
        "INSERT INTO email_subscribers (id, email, subscribed_at, verified) \
         VALUES ($1, $2, now(), $3)",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(verified)
    .execute(db_pool)
    .await
    .expect("Failed to seed a subscriber");
}

pub async fn seed_newsletter(db_pool: &PgPool, title: &str, content: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO newsletters (id, title, content, status, created_at) \
         VALUES ($1, $2, $3, 'draft', now())",
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .execute(db_pool)
    .await
    .expect("Failed to seed a newsletter");
    id
}

pub async fn seed_pending_order(
    db_pool: &PgPool,
    customer_email: &str,
    product_name: &str,
    amount: i64,
    checkout_session_id: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO orders \
            (id, customer_email, product_name, amount, status, checkout_session_id, \
             created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 'pending', $5, now(), now())",
    )
    .bind(id)
    .bind(customer_email)
    .bind(product_name)
    .bind(amount)
    .bind(checkout_session_id)
    .execute(db_pool)
    .await
    .expect("Failed to seed an order");
    id
}

/// A booking payload whose appointment date is safely in the future.
pub fn valid_booking_body() -> serde_json::Value {
    let date = (time::OffsetDateTime::now_utc().date() + time::Duration::days(7)).to_string();
    serde_json::json!({
        "name": "Jane Doe",
        "businessName": "Lincoln School",
        "contactNumber": "5551234567",
        "location": "100 Main St, Midland, TX",
        "appointmentDate": date,
        "appointmentTime": "10:00 AM",
    })
}
