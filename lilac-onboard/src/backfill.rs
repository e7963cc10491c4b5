use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use lilac_core::account::SalonAccount;
use lilac_core::repository::AccountRepository;

use crate::onboarding::{booking_url, provision_slug, OnboardError, SlugAssignment};
use crate::slug::SlugAllocator;

/// Per-account record of a successful migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigratedAccount {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Aggregate result returned by the backfill endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    pub total_owners: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<MigratedAccount>,
}

/// One-shot remediation for salon owners created before slug assignment
/// existed: every owner missing `slug` or `booking_url` gets both, without
/// any email being sent.
pub struct BackfillWorkflow {
    accounts: Arc<dyn AccountRepository>,
    allocator: SlugAllocator,
    booking_base_url: String,
}

impl BackfillWorkflow {
    pub fn new(accounts: Arc<dyn AccountRepository>, booking_base_url: String) -> Self {
        let allocator = SlugAllocator::new(accounts.clone());
        Self {
            accounts,
            allocator,
            booking_base_url,
        }
    }

    pub async fn run(&self) -> Result<BackfillReport, OnboardError> {
        let owners = self
            .accounts
            .list_salon_owners()
            .await
            .map_err(|e| OnboardError::Store(e.to_string()))?;

        let mut report = BackfillReport {
            total_owners: owners.len(),
            migrated: 0,
            skipped: 0,
            failed: 0,
            results: Vec::new(),
        };

        for account in &owners {
            if account.slug.is_some() && account.booking_url.is_some() {
                report.skipped += 1;
                continue;
            }
            match self.migrate_account(account).await {
                Ok(Some(record)) => {
                    info!("Migrated: {} -> {}", record.name, record.slug);
                    report.results.push(record);
                    report.migrated += 1;
                }
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    // One bad record must not abort the rest of the backfill.
                    error!("Backfill failed for account {}: {}", account.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Slug backfill complete: {} owners, {} migrated, {} skipped, {} failed",
            report.total_owners, report.migrated, report.skipped, report.failed
        );
        Ok(report)
    }

    async fn migrate_account(
        &self,
        account: &SalonAccount,
    ) -> Result<Option<MigratedAccount>, OnboardError> {
        let name = account.business_name_or_default().to_string();

        // Slug already assigned: only the derived URL is missing.
        if let Some(slug) = &account.slug {
            let url = booking_url(&self.booking_base_url, slug);
            let updated = self
                .accounts
                .set_booking_url(&account.id, &url)
                .await
                .map_err(|e| OnboardError::Store(e.to_string()))?;
            return Ok(updated.then(|| MigratedAccount {
                id: account.id.clone(),
                name,
                slug: slug.clone(),
            }));
        }

        match provision_slug(
            self.accounts.as_ref(),
            &self.allocator,
            &self.booking_base_url,
            &account.id,
            &name,
        )
        .await?
        {
            SlugAssignment::Fresh { slug, .. } => Ok(Some(MigratedAccount {
                id: account.id.clone(),
                name,
                slug,
            })),
            // Provisioned concurrently while the backfill was running.
            SlugAssignment::Existing { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lilac_core::memory::{owner_account, MemoryAccountRepository};

    const BASE_URL: &str = "https://book.lilac.example.com";

    #[tokio::test]
    async fn test_backfill_reports_aggregate_counts() {
        let repo = Arc::new(MemoryAccountRepository::new());
        repo.insert(owner_account("owner-1", "ABC Salon"));
        repo.insert(owner_account("owner-2", "Jane's Nails & Spa!"));
        let mut done = owner_account("owner-3", "Done Salon");
        done.slug = Some("done-salon".to_string());
        done.booking_url = Some(format!("{}/done-salon", BASE_URL));
        repo.insert(done);

        let report = BackfillWorkflow::new(repo.clone(), BASE_URL.to_string())
            .run()
            .await
            .unwrap();

        assert_eq!(report.total_owners, 3);
        assert_eq!(report.migrated, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.results.len(), 2);

        let migrated = repo.get("owner-2").unwrap();
        assert_eq!(migrated.slug.as_deref(), Some("janes-nails-spa"));
        assert_eq!(
            migrated.booking_url.as_deref(),
            Some("https://book.lilac.example.com/janes-nails-spa")
        );
    }

    #[tokio::test]
    async fn test_backfill_repairs_missing_booking_url() {
        let repo = Arc::new(MemoryAccountRepository::new());
        let mut account = owner_account("owner-1", "ABC Salon");
        account.slug = Some("abc-salon".to_string());
        repo.insert(account);

        let report = BackfillWorkflow::new(repo.clone(), BASE_URL.to_string())
            .run()
            .await
            .unwrap();

        assert_eq!(report.migrated, 1);
        let repaired = repo.get("owner-1").unwrap();
        assert_eq!(repaired.slug.as_deref(), Some("abc-salon"));
        assert_eq!(
            repaired.booking_url.as_deref(),
            Some("https://book.lilac.example.com/abc-salon")
        );
    }

    #[tokio::test]
    async fn test_backfill_suffixes_duplicate_names() {
        let repo = Arc::new(MemoryAccountRepository::new());
        repo.insert(owner_account("owner-1", "ABC Salon"));
        repo.insert(owner_account("owner-2", "ABC Salon"));

        let report = BackfillWorkflow::new(repo.clone(), BASE_URL.to_string())
            .run()
            .await
            .unwrap();

        assert_eq!(report.migrated, 2);
        let mut slugs: Vec<String> = report.results.iter().map(|r| r.slug.clone()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["abc-salon".to_string(), "abc-salon-1".to_string()]);
    }

    #[tokio::test]
    async fn test_backfill_ignores_non_owner_accounts() {
        let repo = Arc::new(MemoryAccountRepository::new());
        repo.insert(owner_account("owner-1", "ABC Salon"));
        let mut staff = owner_account("staff-1", "ABC Salon");
        staff.role = "staff".to_string();
        repo.insert(staff);

        let report = BackfillWorkflow::new(repo.clone(), BASE_URL.to_string())
            .run()
            .await
            .unwrap();

        assert_eq!(report.total_owners, 1);
        assert_eq!(report.migrated, 1);
    }

    #[tokio::test]
    async fn test_backfill_report_serializes_camel_case() {
        let repo = Arc::new(MemoryAccountRepository::new());
        repo.insert(owner_account("owner-1", "ABC Salon"));

        let report = BackfillWorkflow::new(repo, BASE_URL.to_string())
            .run()
            .await
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalOwners"], 1);
        assert_eq!(json["migrated"], 1);
        assert_eq!(json["skipped"], 0);
        assert_eq!(json["results"][0]["id"], "owner-1");
        assert_eq!(json["results"][0]["name"], "ABC Salon");
        assert_eq!(json["results"][0]["slug"], "abc-salon");
    }

    /// Account store that fails every write for one poisoned account id.
    struct FlakyAccounts {
        inner: Arc<MemoryAccountRepository>,
        poisoned: String,
    }

    #[async_trait]
    impl AccountRepository for FlakyAccounts {
        async fn get_account(
            &self,
            id: &str,
        ) -> Result<Option<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.get_account(id).await
        }

        async fn is_slug_taken(
            &self,
            slug: &str,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.is_slug_taken(slug).await
        }

        async fn assign_slug_if_free(
            &self,
            id: &str,
            slug: &str,
            booking_url: &str,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            if id == self.poisoned {
                return Err("document write rejected".into());
            }
            self.inner.assign_slug_if_free(id, slug, booking_url).await
        }

        async fn set_booking_url(
            &self,
            id: &str,
            booking_url: &str,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.set_booking_url(id, booking_url).await
        }

        async fn list_salon_owners(
            &self,
        ) -> Result<Vec<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.list_salon_owners().await
        }
    }

    #[tokio::test]
    async fn test_backfill_isolates_account_failures() {
        let inner = Arc::new(MemoryAccountRepository::new());
        inner.insert(owner_account("owner-1", "ABC Salon"));
        inner.insert(owner_account("owner-2", "Broken Salon"));

        let accounts = Arc::new(FlakyAccounts {
            inner: inner.clone(),
            poisoned: "owner-2".to_string(),
        });
        let report = BackfillWorkflow::new(accounts, BASE_URL.to_string())
            .run()
            .await
            .unwrap();

        assert_eq!(report.total_owners, 2);
        assert_eq!(report.migrated, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(inner.get("owner-1").unwrap().slug.as_deref(), Some("abc-salon"));
    }
}
