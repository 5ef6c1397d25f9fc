//! Token verification.
//!
//! Sessions are issued by an external identity provider; the API only
//! verifies the HS256 tokens it signs. See [`jwt`].

pub mod jwt;
