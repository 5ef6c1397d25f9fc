//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-owned transaction take `&mut PgConnection` instead.

pub mod application_repo;
pub mod appointment_slot_repo;
pub mod certificate_repo;
pub mod notification_repo;
pub mod officer_repo;
pub mod performance_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use appointment_slot_repo::{AppointmentSlotRepo, PgSlotLedger};
pub use certificate_repo::CertificateRepo;
pub use notification_repo::NotificationRepo;
pub use officer_repo::OfficerRepo;
pub use performance_repo::PerformanceRepo;
pub use user_repo::UserRepo;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
