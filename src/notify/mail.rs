//! Mail delivery through an HTTP mail gateway.

use crate::infra::config;
use crate::notify::Notifier;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Posts notification mails as JSON to a configured gateway endpoint.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Builds a mailer from the environment, or `None` when no gateway is
    /// configured.
    pub fn from_env() -> Option<Self> {
        config::mail_gateway_url().map(Self::new)
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&json!({ "subject": subject, "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Sink for deployments without a mail gateway; drops every message.
pub struct NullMailer;

#[async_trait]
impl Notifier for NullMailer {
    async fn notify(&self, subject: &str, _body: &str) -> anyhow::Result<()> {
        debug!(subject, "no mail gateway configured, dropping notification");
        Ok(())
    }
}
