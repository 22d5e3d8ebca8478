pub mod address_client;
pub mod app_state;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod payment_client;
pub mod product_catalog;
pub mod routes;
pub mod startup;
pub mod storage_client;
pub mod telemetry;
