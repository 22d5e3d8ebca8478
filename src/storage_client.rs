use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the object store's signed-URL endpoint. Digital products are
/// never served directly; buyers get time-limited links minted here.
#[derive(Clone)]
pub struct StorageClient {
    http_client: Client,
    base_url: String,
    service_key: Secret<String>,
    bucket: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DownloadLink {
    pub filename: String,
    pub url: String,
}

impl StorageClient {
    pub fn new(
        base_url: String,
        service_key: Secret<String>,
        bucket: String,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            http_client,
            base_url,
            service_key,
            bucket,
        }
    }

    /// Mints a signed URL for one object in the configured bucket.
    pub async fn create_signed_url(
        &self,
        object_path: &str,
        expires_in: Duration,
    ) -> Result<DownloadLink, Error> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{object_path}",
            &self.base_url, &self.bucket
        );
        let request_body = SignRequest {
            expires_in: expires_in.as_secs(),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.service_key.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?
            .json::<SignResponse>()
            .await?;

        let filename = object_path
            .rsplit('/')
            .next()
            .unwrap_or(object_path)
            .to_string();

        Ok(DownloadLink {
            filename,
            url: format!("{}/storage/v1{}", &self.base_url, response.signed_url),
        })
    }
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}
