use std::sync::Arc;

use tracing::{error, info, warn};

use lilac_core::account::{SalonAccount, SALON_OWNER_ROLE};
use lilac_core::events::AccountCreatedEvent;
use lilac_core::mailer::Mailer;
use lilac_core::repository::AccountRepository;

use crate::email::BookingLinkEmail;
use crate::slug::{AllocateError, SlugAllocator};

/// Join the public booking engine origin with a slug.
pub(crate) fn booking_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// What a slug provisioning attempt concluded.
pub(crate) enum SlugAssignment {
    /// This call won the conditional write.
    Fresh { slug: String, booking_url: String },
    /// The account already carried a slug, or gained one concurrently.
    Existing { slug: String, booking_url: String },
}

/// Allocate a slug and persist it with a conditional write, retrying the
/// whole probe-and-persist cycle whenever the write loses a race.
///
/// The conditional write refuses for two distinct reasons, told apart by
/// re-reading the account: another signup claimed the candidate slug
/// (retry), or this account was provisioned concurrently (done).
pub(crate) async fn provision_slug(
    accounts: &dyn AccountRepository,
    allocator: &SlugAllocator,
    base_url: &str,
    account_id: &str,
    business_name: &str,
) -> Result<SlugAssignment, OnboardError> {
    loop {
        let slug = allocator.allocate(business_name).await?;
        let url = booking_url(base_url, &slug);

        let assigned = accounts
            .assign_slug_if_free(account_id, &slug, &url)
            .await
            .map_err(|e| OnboardError::Store(e.to_string()))?;
        if assigned {
            info!("Slug \"{}\" assigned to salon owner {}", slug, account_id);
            return Ok(SlugAssignment::Fresh {
                slug,
                booking_url: url,
            });
        }

        match accounts
            .get_account(account_id)
            .await
            .map_err(|e| OnboardError::Store(e.to_string()))?
        {
            Some(account) => {
                if let Some(existing) = account.slug {
                    let url = account
                        .booking_url
                        .unwrap_or_else(|| booking_url(base_url, &existing));
                    return Ok(SlugAssignment::Existing {
                        slug: existing,
                        booking_url: url,
                    });
                }
                warn!(
                    "Slug \"{}\" was claimed concurrently, retrying allocation for {}",
                    slug, account_id
                );
            }
            None => return Err(OnboardError::AccountVanished(account_id.to_string())),
        }
    }
}

/// Outcome of one account-created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardOutcome {
    /// Account role is not salon_owner; nothing was written.
    SkippedRole { role: String },
    /// Account already carried a slug (or gained one concurrently).
    AlreadyProvisioned { slug: String },
    /// Fresh slug assigned and booking URL derived.
    Provisioned { slug: String, booking_url: String },
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Account {0} disappeared mid-onboarding")]
    AccountVanished(String),
    #[error(transparent)]
    Allocate(#[from] AllocateError),
}

/// Reacts to new salon-owner accounts: assigns the slug, derives the public
/// booking URL, and sends the booking-link email.
pub struct OnboardingWorkflow {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
    allocator: SlugAllocator,
    booking_base_url: String,
    from_address: String,
}

impl OnboardingWorkflow {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        mailer: Arc<dyn Mailer>,
        booking_base_url: String,
        from_address: String,
    ) -> Self {
        let allocator = SlugAllocator::new(accounts.clone());
        Self {
            accounts,
            mailer,
            allocator,
            booking_base_url,
            from_address,
        }
    }

    /// Handle one account-created event.
    ///
    /// Slug persistence and email delivery are deliberately decoupled: a
    /// failed send is logged and never rolls back the assignment.
    pub async fn handle_account_created(
        &self,
        event: &AccountCreatedEvent,
    ) -> Result<OnboardOutcome, OnboardError> {
        let account = &event.account;

        if !account.is_salon_owner() {
            info!(
                "Skipping account {}: role \"{}\" is not {}",
                event.account_id, account.role, SALON_OWNER_ROLE
            );
            return Ok(OnboardOutcome::SkippedRole {
                role: account.role.clone(),
            });
        }

        info!(
            "New salon owner detected: {} ({})",
            account.business_name_or_default(),
            event.account_id
        );

        let assignment = match &account.slug {
            Some(slug) => {
                info!(
                    "Salon owner {} already has slug \"{}\"",
                    event.account_id, slug
                );
                SlugAssignment::Existing {
                    slug: slug.clone(),
                    booking_url: account
                        .booking_url
                        .clone()
                        .unwrap_or_else(|| booking_url(&self.booking_base_url, slug)),
                }
            }
            None => {
                provision_slug(
                    self.accounts.as_ref(),
                    &self.allocator,
                    &self.booking_base_url,
                    &event.account_id,
                    account.business_name_or_default(),
                )
                .await?
            }
        };

        let (slug, url, fresh) = match assignment {
            SlugAssignment::Fresh { slug, booking_url } => (slug, booking_url, true),
            SlugAssignment::Existing { slug, booking_url } => (slug, booking_url, false),
        };

        self.send_booking_link(account, &url).await;

        info!(
            "Salon owner setup complete for {} -> {}",
            account.business_name_or_default(),
            url
        );

        Ok(if fresh {
            OnboardOutcome::Provisioned {
                slug,
                booking_url: url,
            }
        } else {
            OnboardOutcome::AlreadyProvisioned { slug }
        })
    }

    async fn send_booking_link(&self, account: &SalonAccount, url: &str) {
        if account.email.trim().is_empty() {
            warn!(
                "Salon owner {} has no email on file, skipping booking-link email",
                account.id
            );
            return;
        }

        let email = BookingLinkEmail {
            to: account.email.clone(),
            business_name: account.business_name_or_default().to_string(),
            booking_link: url.to_string(),
            owner_name: account.display_name.clone(),
        };
        let message = email.render(&self.from_address);

        if let Err(e) = self.mailer.send(&message).await {
            // The slug is already persisted at this point.
            error!(
                "Failed to send booking-link email to {}: {}",
                account.email, e
            );
        }
    }
}
