use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use lilac_core::mailer::{EmailMessage, Mailer};
use lilac_core::CoreError;

use crate::app_config::EmailConfig;

/// SendGrid-backed mail delivery over the v3 HTTP API.
pub struct SendGridMailer {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl SendGridMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(
        &self,
        message: &EmailMessage,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if message.to.trim().is_empty() {
            return Err(CoreError::ValidationError("no recipient email".to_string()).into());
        }

        let body = serde_json::json!({
            "personalizations": [{
                "to": [{ "email": message.to.trim().to_lowercase() }],
            }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": "text/html", "value": message.html }],
            "tracking_settings": { "click_tracking": { "enable": false } },
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!("SendGrid rejected message to {}: {} {}", message.to, status, detail);
            return Err(
                CoreError::InternalError(format!("SendGrid returned {}", status)).into(),
            );
        }

        info!("Booking-link email sent to {}", message.to);
        Ok(())
    }
}
