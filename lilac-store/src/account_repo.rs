use async_trait::async_trait;
use sqlx::PgPool;

use lilac_core::account::{SalonAccount, SALON_OWNER_ROLE};
use lilac_core::repository::AccountRepository;

const ACCOUNT_COLUMNS: &str =
    "id, email, display_name, role, business_name, slug, booking_url, timezone, created_at, updated_at";

pub struct StoreAccountRepository {
    pool: PgPool,
}

impl StoreAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    display_name: Option<String>,
    role: String,
    business_name: Option<String>,
    slug: Option<String>,
    booking_url: Option<String>,
    timezone: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRow> for SalonAccount {
    fn from(row: AccountRow) -> Self {
        SalonAccount {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role,
            business_name: row.business_name,
            slug: row.slug,
            booking_url: row.booking_url,
            timezone: row.timezone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AccountRepository for StoreAccountRepository {
    async fn get_account(
        &self,
        id: &str,
    ) -> Result<Option<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SalonAccount::from))
    }

    async fn is_slug_taken(
        &self,
        slug: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let hit = sqlx::query("SELECT 1 FROM accounts WHERE role = $1 AND slug = $2 LIMIT 1")
            .bind(SALON_OWNER_ROLE)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hit.is_some())
    }

    async fn assign_slug_if_free(
        &self,
        id: &str,
        slug: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        // Conditional write: refuses when the account is already slugged or
        // another salon owner holds the candidate. The partial unique index
        // on (slug) is the authoritative backstop for the probe/persist
        // window; a violation surfaces here as "not assigned" so the caller
        // re-enters the allocation cycle.
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET slug = $2, booking_url = $3, updated_at = NOW()
            WHERE id = $1
              AND slug IS NULL
              AND NOT EXISTS (
                  SELECT 1 FROM accounts
                  WHERE role = $4 AND slug = $2 AND id <> $1
              )
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(booking_url)
        .bind(SALON_OWNER_ROLE)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() == 1),
            Err(sqlx::Error::Database(db_err))
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_booking_url(
        &self,
        id: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let done = sqlx::query(
            "UPDATE accounts SET booking_url = $2, updated_at = NOW() \
             WHERE id = $1 AND booking_url IS NULL",
        )
        .bind(id)
        .bind(booking_url)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected() == 1)
    }

    async fn list_salon_owners(
        &self,
    ) -> Result<Vec<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE role = $1 ORDER BY created_at, id",
            ACCOUNT_COLUMNS
        ))
        .bind(SALON_OWNER_ROLE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SalonAccount::from).collect())
    }
}
