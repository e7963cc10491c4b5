pub mod account_repo;
pub mod app_config;
pub mod database;
pub mod events;
pub mod hold_repo;
pub mod mailer;

pub use account_repo::StoreAccountRepository;
pub use database::DbClient;
pub use events::EventProducer;
pub use hold_repo::StoreHoldRepository;
pub use mailer::SendGridMailer;
