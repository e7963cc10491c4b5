use std::sync::Arc;

use chrono::Utc;
use lilac_core::repository::AccountRepository;

/// Convert a business name into a URL-friendly slug.
///
/// "ABC Salon" → "abc-salon"
/// "Jane's Nails & Spa!" → "janes-nails-spa"
///
/// Every maximal run of characters outside `[a-z0-9]` collapses into a
/// single `-`; leading and trailing separators are dropped. A purely
/// symbolic name yields an empty string.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Store-backed slug allocation: normalize, probe, append a counter until
/// an unused candidate is found.
///
/// The probe is check-then-act; the conditional write in the account
/// repository is what finally arbitrates concurrent claims (see
/// `onboarding::provision_slug`).
pub struct SlugAllocator {
    accounts: Arc<dyn AccountRepository>,
}

impl SlugAllocator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// "abc-salon" → "abc-salon"   (if unused)
    /// "abc-salon" → "abc-salon-1" (if taken)
    /// "abc-salon" → "abc-salon-2" (if -1 is also taken)
    ///
    /// Fails only when the uniqueness probe cannot reach the store.
    pub async fn allocate(&self, business_name: &str) -> Result<String, AllocateError> {
        let base = generate_slug(business_name);

        // A symbolic-only name has no usable base. Epoch millis keep the
        // synthetic slug unique enough without a store round-trip.
        if base.is_empty() {
            return Ok(format!("salon-{}", Utc::now().timestamp_millis()));
        }

        let mut candidate = base.clone();
        let mut counter = 1u64;
        loop {
            let taken = self
                .accounts
                .is_slug_taken(&candidate)
                .await
                .map_err(|e| AllocateError::Store(e.to_string()))?;
            if !taken {
                return Ok(candidate);
            }
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AllocateError {
    #[error("Slug uniqueness probe failed: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use lilac_core::memory::{owner_account, MemoryAccountRepository};

    fn repo_with_slugs(slugs: &[&str]) -> Arc<MemoryAccountRepository> {
        let repo = Arc::new(MemoryAccountRepository::new());
        for (i, slug) in slugs.iter().enumerate() {
            let mut account = owner_account(&format!("owner-{}", i), "Seeded Salon");
            account.slug = Some((*slug).to_string());
            repo.insert(account);
        }
        repo
    }

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("ABC Salon"), "abc-salon");
        assert_eq!(generate_slug("Jane's Nails & Spa!"), "janes-nails-spa");
    }

    #[test]
    fn test_generate_slug_collapses_and_trims_separators() {
        assert_eq!(generate_slug("  --Polish*** & ***Go--  "), "polish-go");
        assert_eq!(generate_slug("Studio 54"), "studio-54");
        assert_eq!(generate_slug("Ünïcode Spa"), "n-code-spa");
    }

    #[test]
    fn test_generate_slug_empty_for_symbolic_names() {
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug(""), "");
    }

    #[tokio::test]
    async fn test_allocate_returns_base_when_unused() {
        let allocator = SlugAllocator::new(repo_with_slugs(&[]));
        assert_eq!(allocator.allocate("ABC Salon").await.unwrap(), "abc-salon");
    }

    #[tokio::test]
    async fn test_allocate_appends_counter_when_taken() {
        let allocator = SlugAllocator::new(repo_with_slugs(&["abc-salon"]));
        assert_eq!(allocator.allocate("ABC Salon").await.unwrap(), "abc-salon-1");

        let allocator = SlugAllocator::new(repo_with_slugs(&["abc-salon", "abc-salon-1"]));
        assert_eq!(allocator.allocate("ABC Salon").await.unwrap(), "abc-salon-2");
    }

    #[tokio::test]
    async fn test_allocate_falls_back_to_synthetic_slug() {
        let allocator = SlugAllocator::new(repo_with_slugs(&[]));
        let slug = allocator.allocate("!!!").await.unwrap();
        let digits = slug.strip_prefix("salon-").expect("salon- prefix");
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
