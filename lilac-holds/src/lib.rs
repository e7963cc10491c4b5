pub mod memory;
pub mod models;
pub mod repository;
pub mod sweeper;

pub use models::{HoldStatus, SlotHold};
pub use repository::HoldRepository;
pub use sweeper::{HoldSweeper, SweepError, DEFAULT_PAGE_SIZE};
