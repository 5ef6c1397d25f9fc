//! Turns lifecycle events into in-app notifications.
//!
//! [`NotificationDispatcher`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes one `notifications` row per recipient. It shuts down when the
//! bus is dropped.

use civic_core::types::DbId;
use civic_db::repositories::NotificationRepo;
use civic_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{
    PlatformEvent, APPLICATION_APPROVED, APPLICATION_PAID, APPLICATION_REJECTED,
    APPLICATION_SUBMITTED,
};

/// A notification ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub user_id: DbId,
    pub message: String,
}

/// Who hears about an event, and what they are told.
///
/// Unknown event types produce nothing.
pub fn notices_for(event: &PlatformEvent) -> Vec<Notice> {
    let reference = format!("APP-{:08}", event.application_id);
    match event.event_type.as_str() {
        APPLICATION_SUBMITTED => vec![Notice {
            user_id: event.applicant_id,
            message: format!("Application {reference} received. Please complete payment."),
        }],
        APPLICATION_PAID => vec![
            Notice {
                user_id: event.applicant_id,
                message: format!("Payment confirmed for {reference}. It is now under review."),
            },
            Notice {
                user_id: event.officer_id,
                message: format!("Application {reference} is ready for review."),
            },
        ],
        APPLICATION_APPROVED => {
            let appointment = event.payload.get("appointment").and_then(|a| {
                Some(format!(
                    " Collect your document on {} between {}.",
                    a.get("date")?.as_str()?,
                    a.get("time_range")?.as_str()?
                ))
            });
            vec![Notice {
                user_id: event.applicant_id,
                message: format!(
                    "Application {reference} was approved.{}",
                    appointment.unwrap_or_default()
                ),
            }]
        }
        APPLICATION_REJECTED => {
            let reason = event
                .payload
                .get("reason")
                .and_then(|r| r.as_str())
                .unwrap_or("No reason given");
            vec![Notice {
                user_id: event.applicant_id,
                message: format!("Application {reference} was rejected: {reason}"),
            }]
        }
        _ => Vec::new(),
    }
}

/// Background consumer that persists notifications.
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Run until the bus is closed.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    for notice in notices_for(&event) {
                        if let Err(e) = NotificationRepo::create(
                            &pool,
                            notice.user_id,
                            &event.event_type,
                            Some(event.application_id),
                            &notice.message,
                        )
                        .await
                        {
                            tracing::error!(
                                error = %e,
                                event_type = %event.event_type,
                                application_id = event.application_id,
                                user_id = notice.user_id,
                                "Failed to store notification"
                            );
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }
}
