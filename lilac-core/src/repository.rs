use async_trait::async_trait;

use crate::account::SalonAccount;

/// Repository trait for account document access
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Point read of a single account document.
    async fn get_account(
        &self,
        id: &str,
    ) -> Result<Option<SalonAccount>, Box<dyn std::error::Error + Send + Sync>>;

    /// True when some salon-owner account already uses `slug`.
    async fn is_slug_taken(
        &self,
        slug: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Conditionally persist `slug` and the derived booking URL.
    ///
    /// The write succeeds only when the account has no slug yet and no other
    /// salon owner holds `slug`. Returns false when either condition fails,
    /// so the caller can re-probe and retry.
    async fn assign_slug_if_free(
        &self,
        id: &str,
        slug: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Write-once repair of the derived booking URL on an account that
    /// already carries a slug.
    async fn set_booking_url(
        &self,
        id: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Every account carrying the salon-owner role, oldest first.
    async fn list_salon_owners(
        &self,
    ) -> Result<Vec<SalonAccount>, Box<dyn std::error::Error + Send + Sync>>;
}
