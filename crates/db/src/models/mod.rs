//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where the entity is written by the API

pub mod application;
pub mod appointment;
pub mod certificate;
pub mod notification;
pub mod performance;
pub mod user;
