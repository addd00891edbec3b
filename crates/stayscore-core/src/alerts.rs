//! Background delivery of staff alerts.
//!
//! Handlers enqueue alerts and return immediately. A worker task drains the
//! queue and fans each alert out to SMS and the notification topic as
//! independent tasks. Delivery results never reach the response path.

use crate::collaborators::{SmsSender, TopicPublisher};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

/// A message for hotel staff about a poor rating.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffAlert {
    pub message: String,
    pub rating: i64,
    pub unit_name: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl StaffAlert {
    pub fn new(message: impl Into<String>, rating: i64, unit_name: Option<String>) -> Self {
        Self {
            message: message.into(),
            rating,
            unit_name,
            raised_at: Utc::now(),
        }
    }
}

/// Handle used by handlers to enqueue alerts. Cheap to clone.
#[derive(Clone)]
pub struct AlertDispatcher {
    tx: UnboundedSender<StaffAlert>,
}

/// The worker task behind an [`AlertDispatcher`].
pub struct AlertWorker {
    handle: JoinHandle<()>,
}

impl AlertDispatcher {
    /// Spawns the worker on the current runtime.
    ///
    /// `sms_destination` of `None` skips SMS delivery.
    pub fn start(
        sms: Arc<dyn SmsSender>,
        publisher: Arc<dyn TopicPublisher>,
        sms_destination: Option<String>,
    ) -> (Self, AlertWorker) {
        let (tx, rx) = unbounded_channel();
        let handle = tokio::spawn(run_worker(rx, sms, publisher, sms_destination));
        (Self { tx }, AlertWorker { handle })
    }

    /// Enqueues an alert without waiting for delivery.
    pub fn dispatch(&self, alert: StaffAlert) {
        debug!("Queueing staff alert for rating {}", alert.rating);
        if let Err(e) = self.tx.send(alert) {
            error!("Alert worker is gone; dropping staff alert: {}", e.0.message);
        }
    }
}

impl AlertWorker {
    /// Waits until every queued alert has been delivered or failed.
    ///
    /// Returns once all dispatchers have been dropped and the queue is empty.
    pub async fn drain(self) {
        if let Err(e) = self.handle.await {
            error!("Alert worker terminated abnormally: {}", e);
        }
    }
}

async fn run_worker(
    mut rx: UnboundedReceiver<StaffAlert>,
    sms: Arc<dyn SmsSender>,
    publisher: Arc<dyn TopicPublisher>,
    sms_destination: Option<String>,
) {
    let mut in_flight = JoinSet::new();

    while let Some(alert) = rx.recv().await {
        while in_flight.try_join_next().is_some() {}

        info!(
            "Delivering staff alert raised at {} for unit {}",
            alert.raised_at.to_rfc3339(),
            alert.unit_name.as_deref().unwrap_or("<unknown>")
        );

        match &sms_destination {
            Some(destination) => {
                let sms = Arc::clone(&sms);
                let message = alert.message.clone();
                let destination = destination.clone();
                in_flight.spawn(async move {
                    if let Err(e) = sms.send(&message, &destination).await {
                        warn!("Staff SMS was not delivered: {}", e);
                    }
                });
            }
            None => info!("No staff SMS number configured; skipping SMS"),
        }

        let publisher = Arc::clone(&publisher);
        let message = alert.message;
        in_flight.spawn(async move {
            match publisher.publish(&message).await {
                Ok(200) => debug!("Staff alert published"),
                Ok(status) => warn!("Staff alert publish returned status {}", status),
                Err(e) => warn!("Staff alert was not published: {}", e),
            }
        });
    }

    while let Some(result) = in_flight.join_next().await {
        if let Err(e) = result {
            error!("Staff alert task failed: {}", e);
        }
    }
    debug!("Alert worker stopped");
}
