use crate::{
    address_client::AddressClient, domain::EmailAddress, email_client::EmailClient,
    payment_client::PaymentClient, storage_client::StorageClient,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use std::time::Duration;
use tracing_log::log::LevelFilter;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub payment_client: PaymentClientSettings,
    pub address_client: AddressClientSettings,
    pub storage_client: StorageClientSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub base_url: String,
    admin_email: String,
}

impl ApplicationSettings {
    pub fn admin_email(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.admin_email.clone())
    }
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.database_name)
            .log_statements(LevelFilter::Trace)
    }

    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(ssl_mode)
    }
}

#[derive(Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    sender_email: String,
    pub authorization_token: Secret<String>,
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> EmailClient {
        let sender = self.sender().expect("Invalid sender email address");
        EmailClient::new(
            self.base_url.clone(),
            sender,
            self.authorization_token.clone(),
            self.timeout(),
        )
    }
}

#[derive(Deserialize)]
pub struct PaymentClientSettings {
    pub base_url: String,
    pub secret_key: Secret<String>,
    default_customer_email: String,
    pub timeout_milliseconds: u64,
}

impl PaymentClientSettings {
    pub fn default_customer_email(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.default_customer_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> PaymentClient {
        PaymentClient::new(
            self.base_url.clone(),
            self.secret_key.clone(),
            self.timeout(),
        )
    }
}

#[derive(Deserialize)]
pub struct AddressClientSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    pub country_bias: String,
    pub timeout_milliseconds: u64,
}

impl AddressClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> AddressClient {
        AddressClient::new(
            self.base_url.clone(),
            self.api_key.clone(),
            self.country_bias.clone(),
            self.timeout(),
        )
    }
}

#[derive(Deserialize)]
pub struct StorageClientSettings {
    pub base_url: String,
    pub service_key: Secret<String>,
    pub bucket: String,
    pub timeout_milliseconds: u64,
}

impl StorageClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> StorageClient {
        StorageClient::new(
            self.base_url.clone(),
            self.service_key.clone(),
            self.bucket.clone(),
            self.timeout(),
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config_dir = std::env::current_dir()
        .map(|dir| dir.join("configuration"))
        .expect("Failed to determine the current directory");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse app environment");

    let env_config = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(config::File::from(config_dir.join(env_config)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
