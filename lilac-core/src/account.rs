use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role tag carried by salon-owner accounts. The `accounts` collection also
/// holds staff and admin-panel users; none of those trigger onboarding.
pub const SALON_OWNER_ROLE: &str = "salon_owner";

/// Salon owner account document, as created by the admin-panel signup flow.
///
/// The onboarding and backfill workflows own the write path for `slug` and
/// `booking_url`; both are written once and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonAccount {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    /// Business name entered at signup.
    pub business_name: Option<String>,
    /// URL-friendly business identifier, unique among salon owners.
    pub slug: Option<String>,
    /// Full public booking page URL, derived from the slug.
    pub booking_url: Option<String>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalonAccount {
    pub fn is_salon_owner(&self) -> bool {
        self.role == SALON_OWNER_ROLE
    }

    /// Business name with the signup-flow fallbacks applied: an empty or
    /// missing business name falls back to the owner's display name, then
    /// to a generic "salon".
    pub fn business_name_or_default(&self) -> &str {
        for candidate in [&self.business_name, &self.display_name] {
            if let Some(name) = candidate {
                if !name.trim().is_empty() {
                    return name;
                }
            }
        }
        "salon"
    }
}
