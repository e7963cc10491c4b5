use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound email payload accepted by the delivery provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single message. Failures surface to the caller, which
    /// decides whether they are fatal; onboarding treats them as best-effort.
    async fn send(
        &self,
        message: &EmailMessage,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
