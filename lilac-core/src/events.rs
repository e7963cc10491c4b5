use serde::{Deserialize, Serialize};

use crate::account::SalonAccount;

/// Emitted by the signup flow when a new account document is created.
///
/// `account_id` duplicates `account.id` so consumers can key and log a
/// message without deserializing the full document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreatedEvent {
    pub account_id: String,
    pub account: SalonAccount,
}

/// Published after onboarding persists a slug, for downstream consumers
/// (booking engine cache warmers, analytics).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOnboardedEvent {
    pub account_id: String,
    pub slug: String,
    pub booking_url: String,
}
