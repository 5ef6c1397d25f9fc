//! Application lifecycle engine.
//!
//! - [`submission`] -- officer assignment, application creation and payment
//!   confirmation.
//! - [`review`] -- the approve/reject transactions.
//! - [`issuance`] -- appointment reservation and certificate issuance, run
//!   inside the approval transaction.
//!
//! Events are published only after the owning transaction commits.

pub mod issuance;
pub mod review;
pub mod submission;
