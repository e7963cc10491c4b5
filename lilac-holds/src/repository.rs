use async_trait::async_trait;

use crate::models::SlotHold;

/// Repository trait for slot hold access
#[async_trait]
pub trait HoldRepository: Send + Sync {
    /// Active holds whose deadline has passed, oldest deadline first,
    /// capped at `limit` to respect the store's batch-write ceiling.
    async fn find_expirable(
        &self,
        now_millis: i64,
        limit: usize,
    ) -> Result<Vec<SlotHold>, Box<dyn std::error::Error + Send + Sync>>;

    /// Atomically mark the given holds expired. All-or-nothing: a failed
    /// batch leaves every hold untouched. Returns the number updated.
    async fn expire_batch(
        &self,
        hold_ids: &[String],
        expired_at_millis: i64,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}
