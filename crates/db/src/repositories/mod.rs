//! PostgreSQL repositories, one per table.
//!
//! Repositories are stateless: every method takes the pool explicitly.

pub mod message_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod profile_repo;
pub mod project_repo;

pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use payment_repo::PaymentRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
