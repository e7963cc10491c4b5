//! In-memory collaborators for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::{SalonAccount, SALON_OWNER_ROLE};
use crate::mailer::{EmailMessage, Mailer};
use crate::repository::AccountRepository;
use crate::CoreError;

/// Salon-owner account fixture with no slug assigned yet.
pub fn owner_account(id: &str, business_name: &str) -> SalonAccount {
    let now = Utc::now();
    SalonAccount {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        display_name: None,
        role: SALON_OWNER_ROLE.to_string(),
        business_name: Some(business_name.to_string()),
        slug: None,
        booking_url: None,
        timezone: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory account store backed by a map.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<HashMap<String, SalonAccount>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: SalonAccount) {
        self.accounts
            .lock()
            .expect("account map poisoned")
            .insert(account.id.clone(), account);
    }

    pub fn get(&self, id: &str) -> Option<SalonAccount> {
        self.accounts
            .lock()
            .expect("account map poisoned")
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn get_account(
        &self,
        id: &str,
    ) -> Result<Option<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get(id))
    }

    async fn is_slug_taken(
        &self,
        slug: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let accounts = self.accounts.lock().expect("account map poisoned");
        Ok(accounts
            .values()
            .any(|a| a.role == SALON_OWNER_ROLE && a.slug.as_deref() == Some(slug)))
    }

    async fn assign_slug_if_free(
        &self,
        id: &str,
        slug: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut accounts = self.accounts.lock().expect("account map poisoned");
        let taken = accounts
            .values()
            .any(|a| a.id != id && a.role == SALON_OWNER_ROLE && a.slug.as_deref() == Some(slug));
        if taken {
            return Ok(false);
        }
        match accounts.get_mut(id) {
            Some(account) if account.slug.is_none() => {
                account.slug = Some(slug.to_string());
                account.booking_url = Some(booking_url.to_string());
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_booking_url(
        &self,
        id: &str,
        booking_url: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut accounts = self.accounts.lock().expect("account map poisoned");
        match accounts.get_mut(id) {
            Some(account) if account.booking_url.is_none() => {
                account.booking_url = Some(booking_url.to_string());
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_salon_owners(
        &self,
    ) -> Result<Vec<SalonAccount>, Box<dyn std::error::Error + Send + Sync>> {
        let accounts = self.accounts.lock().expect("account map poisoned");
        let mut owners: Vec<SalonAccount> = accounts
            .values()
            .filter(|a| a.role == SALON_OWNER_ROLE)
            .cloned()
            .collect();
        owners.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(owners)
    }
}

/// Mailer double that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails, for exercising best-effort paths.
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("sent log poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        message: &EmailMessage,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::InternalError("mail provider unavailable".to_string()).into());
        }
        self.sent
            .lock()
            .expect("sent log poisoned")
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_slug_is_conditional() {
        let repo = MemoryAccountRepository::new();
        repo.insert(owner_account("owner-1", "ABC Salon"));
        let mut rival = owner_account("owner-2", "ABC Salon");
        rival.slug = Some("abc-salon".to_string());
        repo.insert(rival);

        // Another owner already holds the slug.
        let assigned = repo
            .assign_slug_if_free("owner-1", "abc-salon", "https://book.example.com/abc-salon")
            .await
            .unwrap();
        assert!(!assigned);
        assert_eq!(repo.get("owner-1").unwrap().slug, None);

        // A free slug is persisted together with the booking URL.
        let assigned = repo
            .assign_slug_if_free(
                "owner-1",
                "abc-salon-1",
                "https://book.example.com/abc-salon-1",
            )
            .await
            .unwrap();
        assert!(assigned);
        let account = repo.get("owner-1").unwrap();
        assert_eq!(account.slug.as_deref(), Some("abc-salon-1"));
        assert_eq!(
            account.booking_url.as_deref(),
            Some("https://book.example.com/abc-salon-1")
        );

        // Slug writes are once-only.
        let reassigned = repo
            .assign_slug_if_free("owner-1", "abc-salon-2", "https://book.example.com/abc-salon-2")
            .await
            .unwrap();
        assert!(!reassigned);
        assert_eq!(repo.get("owner-1").unwrap().slug.as_deref(), Some("abc-salon-1"));
    }

    #[tokio::test]
    async fn test_list_salon_owners_filters_and_orders() {
        let repo = MemoryAccountRepository::new();
        let mut staff = owner_account("staff-1", "ABC Salon");
        staff.role = "staff".to_string();
        repo.insert(staff);
        repo.insert(owner_account("owner-b", "B Salon"));
        repo.insert(owner_account("owner-a", "A Salon"));

        let owners = repo.list_salon_owners().await.unwrap();
        assert_eq!(owners.len(), 2);
        assert!(owners.iter().all(|a| a.is_salon_owner()));
    }

    #[tokio::test]
    async fn test_recording_mailer_failure_mode() {
        let mailer = RecordingMailer::failing();
        let message = EmailMessage {
            to: "owner@example.com".to_string(),
            from: "noreply@example.com".to_string(),
            subject: "subject".to_string(),
            html: "<p>hi</p>".to_string(),
        };
        assert!(mailer.send(&message).await.is_err());
        assert!(mailer.sent().is_empty());
    }
}
