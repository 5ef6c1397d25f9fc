//! Domain layer for the civil-services request platform.
//!
//! Everything in this crate is storage-agnostic: enums, validation rules,
//! the application state machine, the appointment slot search and the
//! certificate document renderer. Persistence lives in `civic-db`.

pub mod application;
pub mod appointment;
pub mod assignment;
pub mod certificate;
pub mod error;
pub mod roles;
pub mod types;
