use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings},
    notifications::NotificationDispatcher,
    routes,
    telemetry::{request_span, RequestUuid},
};
use axum::Router;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub struct Application {
    local_addr: SocketAddr,
    listener: TcpListener,
    app: Router,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Application, anyhow::Error> {
        let db_pool = get_pg_connection_pool(&config.database);

        let admin_email = config
            .application
            .admin_email()
            .map_err(anyhow::Error::msg)?;
        let default_customer_email = config
            .payment_client
            .default_customer_email()
            .map_err(anyhow::Error::msg)?;
        let dispatcher = NotificationDispatcher::new(config.email_client.client(), admin_email);

        let app_state = AppState {
            db_pool,
            payment_client: config.payment_client.client(),
            address_client: config.address_client.client(),
            storage_client: config.storage_client.client(),
            dispatcher,
            base_url: config.application.base_url.clone(),
            default_customer_email,
        };

        let listener = TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))
        .await?;
        let local_addr = listener.local_addr()?;
        let app = router(app_state);

        Ok(Self {
            local_addr,
            listener,
            app,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.app).await
    }
}

fn router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health_check::router())
        .merge(routes::appointments::router())
        .merge(routes::subscriptions::router())
        .merge(routes::contact::router())
        .merge(routes::newsletters::router())
        .merge(routes::notifications::router())
        .merge(routes::photos::router())
        .merge(routes::donations::router())
        .merge(routes::payments::router())
        .merge(routes::addresses::router())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(RequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

pub fn get_pg_connection_pool(settings: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(settings.with_db())
}
