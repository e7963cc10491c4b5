use async_trait::async_trait;
use sqlx::PgPool;

use lilac_holds::models::SlotHold;
use lilac_holds::repository::HoldRepository;

pub struct StoreHoldRepository {
    pool: PgPool,
}

impl StoreHoldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct HoldRow {
    id: String,
    session_id: String,
    status: String,
    expires_at: i64,
    expired_at: Option<i64>,
    created_at: i64,
}

impl TryFrom<HoldRow> for SlotHold {
    type Error = Box<dyn std::error::Error + Send + Sync>;

    fn try_from(row: HoldRow) -> Result<Self, Self::Error> {
        Ok(SlotHold {
            id: row.id,
            session_id: row.session_id,
            status: row.status.parse()?,
            expires_at: row.expires_at,
            expired_at: row.expired_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl HoldRepository for StoreHoldRepository {
    async fn find_expirable(
        &self,
        now_millis: i64,
        limit: usize,
    ) -> Result<Vec<SlotHold>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, HoldRow>(
            "SELECT id, session_id, status, expires_at, expired_at, created_at \
             FROM slot_holds \
             WHERE status = 'active' AND expires_at <= $1 \
             ORDER BY expires_at, id \
             LIMIT $2",
        )
        .bind(now_millis)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SlotHold::try_from).collect()
    }

    async fn expire_batch(
        &self,
        hold_ids: &[String],
        expired_at_millis: i64,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        // Single transaction keeps the batch all-or-nothing; the status
        // predicate makes the transition monotonic even if a hold slipped
        // into the batch twice.
        let mut tx = self.pool.begin().await?;

        let done = sqlx::query(
            "UPDATE slot_holds \
             SET status = 'expired', expired_at = $2 \
             WHERE id = ANY($1) AND status = 'active'",
        )
        .bind(hold_ids.to_vec())
        .bind(expired_at_millis)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(done.rows_affected())
    }
}
