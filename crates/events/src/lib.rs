//! Application lifecycle events and in-app notification fan-out.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the event envelope published after a lifecycle
//!   transaction commits.
//! - [`NotificationDispatcher`] -- background consumer that turns events
//!   into `notifications` rows.

pub mod bus;
pub mod notifications;

pub use bus::{EventBus, PlatformEvent};
pub use notifications::NotificationDispatcher;
