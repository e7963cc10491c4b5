use std::sync::Arc;

use tracing::info;

use crate::repository::HoldRepository;

/// Store batch writes are capped, so a single sweep never touches more
/// holds than this; the remainder rolls over to the next scheduled run.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Reclaims slot holds that were never confirmed.
///
/// The sweeper is a safety net: readers also check `expires_at` at read
/// time, so a hold that outlives its deadline between sweeps does not
/// block a slot in the interim.
pub struct HoldSweeper {
    holds: Arc<dyn HoldRepository>,
    page_size: usize,
}

impl HoldSweeper {
    pub fn new(holds: Arc<dyn HoldRepository>) -> Self {
        Self {
            holds,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// One sweep: query a page of overdue active holds and expire them in a
    /// single all-or-nothing batch. Returns the number reclaimed.
    ///
    /// Any failure abandons the run without partial state; the holds stay
    /// `active` and are picked up by the next invocation.
    pub async fn run_once(&self, now_millis: i64) -> Result<usize, SweepError> {
        let expirable = self
            .holds
            .find_expirable(now_millis, self.page_size)
            .await
            .map_err(|e| SweepError::Store(e.to_string()))?;

        if expirable.is_empty() {
            info!("No expired holds to clean up");
            return Ok(0);
        }

        let ids: Vec<String> = expirable.iter().map(|h| h.id.clone()).collect();
        let updated = self
            .holds
            .expire_batch(&ids, now_millis)
            .await
            .map_err(|e| SweepError::Store(e.to_string()))?;

        info!("Cleaned up {} expired slot hold(s)", updated);
        Ok(updated as usize)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Hold sweep aborted: {0}")]
    Store(String),
}
