pub mod account;
pub mod events;
pub mod mailer;
pub mod memory;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub use account::{SalonAccount, SALON_OWNER_ROLE};
pub use events::{AccountCreatedEvent, OwnerOnboardedEvent};
pub use mailer::{EmailMessage, Mailer};
pub use repository::AccountRepository;
