use crate::{domain::EmailAddress, email_client::EmailClient};

pub mod templates;

pub use templates::RenderedEmail;

/// Renders and delivers transactional email.
///
/// Most flows use [`notify`](NotificationDispatcher::notify): a best-effort
/// send whose failure is logged and reported in the outcome, never raised.
/// Callers that must surface delivery failure (the plain notification-email
/// endpoint, the newsletter loop's per-recipient bookkeeping) use
/// [`send`](NotificationDispatcher::send) instead.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email_client: EmailClient,
    admin_email: EmailAddress,
}

#[derive(Debug)]
pub struct DispatchOutcome {
    pub sent: bool,
    pub message_id: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(email_client: EmailClient, admin_email: EmailAddress) -> Self {
        Self {
            email_client,
            admin_email,
        }
    }

    pub fn admin_email(&self) -> &EmailAddress {
        &self.admin_email
    }

    pub async fn send(
        &self,
        recipient: &EmailAddress,
        email: &RenderedEmail,
    ) -> Result<String, reqwest::Error> {
        self.email_client
            .send_email(recipient, &email.subject, &email.html, &email.text)
            .await
    }

    pub async fn notify(&self, recipient: &EmailAddress, email: &RenderedEmail) -> DispatchOutcome {
        match self.send(recipient, email).await {
            Ok(message_id) => DispatchOutcome {
                sent: true,
                message_id: Some(message_id),
            },
            Err(e) => {
                tracing::warn!(
                    error_cause_chain = ?e,
                    error.message = %e,
                    recipient = %recipient,
                    subject = %email.subject,
                    "Failed to deliver notification email. Continuing."
                );
                DispatchOutcome {
                    sent: false,
                    message_id: None,
                }
            }
        }
    }

    pub async fn notify_admin(&self, email: &RenderedEmail) -> DispatchOutcome {
        self.notify(&self.admin_email, email).await
    }
}
