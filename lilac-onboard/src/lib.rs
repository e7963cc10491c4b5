pub mod backfill;
pub mod email;
pub mod onboarding;
pub mod slug;

pub use backfill::{BackfillReport, BackfillWorkflow, MigratedAccount};
pub use email::BookingLinkEmail;
pub use onboarding::{OnboardError, OnboardOutcome, OnboardingWorkflow};
pub use slug::{generate_slug, AllocateError, SlugAllocator};
