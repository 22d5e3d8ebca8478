use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

/// Client for the payment provider's hosted-checkout REST API.
///
/// Sessions are created with a single line item and `payment` mode (one-time
/// charges only); the provider hosts the payment page and redirects back to
/// the success/cancel URLs supplied by the caller.
#[derive(Clone)]
pub struct PaymentClient {
    http_client: Client,
    base_url: String,
    secret_key: Secret<String>,
}

pub struct NewCheckoutSession<'a> {
    pub customer_email: &'a str,
    pub product_name: &'a str,
    pub product_description: &'a str,
    pub unit_amount_cents: i64,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(&'static str, String)>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page. Absent once the session has been completed.
    pub url: Option<String>,
    pub payment_status: String,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

impl PaymentClient {
    pub fn new(base_url: String, secret_key: Secret<String>, timeout: Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            http_client,
            base_url,
            secret_key,
        }
    }

    pub async fn create_session(
        &self,
        session: NewCheckoutSession<'_>,
    ) -> Result<CheckoutSession, Error> {
        let url = format!("{}/v1/checkout/sessions", &self.base_url);

        // The provider expects bracketed form keys rather than JSON.
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("customer_email".into(), session.customer_email.into()),
            ("success_url".into(), session.success_url),
            ("cancel_url".into(), session.cancel_url),
            ("line_items[0][quantity]".into(), "1".into()),
            ("line_items[0][price_data][currency]".into(), "usd".into()),
            (
                "line_items[0][price_data][unit_amount]".into(),
                session.unit_amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                session.product_name.into(),
            ),
            (
                "line_items[0][price_data][product_data][description]".into(),
                session.product_description.into(),
            ),
        ];
        for (key, value) in session.metadata {
            form.push((format!("metadata[{key}]"), value));
        }

        self.http_client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, Error> {
        let url = format!("{}/v1/checkout/sessions/{session_id}", &self.base_url);

        self.http_client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
