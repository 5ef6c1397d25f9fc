//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`rbac::RequireCitizen`], [`rbac::RequireOfficer`],
//!   [`rbac::RequireAdmin`] -- role gates.

pub mod auth;
pub mod rbac;
