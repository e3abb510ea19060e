//! Outbound notifications to the host.
//!
//! Delivery is fire-and-forget: a notification is handed off without
//! waiting, failures are logged and dropped, and any response body is only
//! decoded to check it is JSON.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use hud_core::{ProgressComplete, PumpComplete};

use crate::error::NotifyError;

/// A message the HUD posts back to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    PumpComplete(PumpComplete),
    ProgressComplete(ProgressComplete),
    /// The player submitted the order card.
    StartFueling { litres: f64 },
    /// The player dismissed the HUD.
    Close,
}

impl Notification {
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Notification::PumpComplete(_) => "pump-complete",
            Notification::ProgressComplete(_) => "progress-complete",
            Notification::StartFueling { .. } => "start-fueling",
            Notification::Close => "close",
        }
    }

    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Notification::PumpComplete(done) => {
                json!({ "litres": done.litres, "completed": done.completed })
            }
            Notification::ProgressComplete(done) => json!({ "completed": done.completed }),
            Notification::StartFueling { litres } => json!({ "liter": litres }),
            Notification::Close => json!({}),
        }
    }
}

impl From<PumpComplete> for Notification {
    fn from(done: PumpComplete) -> Self {
        Notification::PumpComplete(done)
    }
}

impl From<ProgressComplete> for Notification {
    fn from(done: ProgressComplete) -> Self {
        Notification::ProgressComplete(done)
    }
}

/// Sink for outbound notifications.
///
/// Controllers call this while holding their session lock, so implementations
/// must return promptly and must not call back into a controller.
pub trait HostNotifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Posts notifications as JSON to `{base_url}/{endpoint}`.
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    base_url: String,
}

impl HttpNotifier {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Post one notification and decode the reply.
    ///
    /// A reply that is not JSON decodes to an empty object.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when the request fails or the host answers with a
    /// non-success status.
    pub async fn post(&self, notification: &Notification) -> Result<Value, NotifyError> {
        let response = self
            .client
            .post(self.url_for(notification.endpoint()))
            .json(&notification.payload())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status()));
        }

        Ok(response.json::<Value>().await.unwrap_or_else(|_| json!({})))
    }
}

impl HostNotifier for HttpNotifier {
    fn notify(&self, notification: Notification) {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.post(&notification).await {
                Ok(_) => debug!(endpoint = notification.endpoint(), "notification delivered"),
                Err(err) => warn!(
                    endpoint = notification.endpoint(),
                    error = %err,
                    "notification dropped"
                ),
            }
        });
    }
}

/// Logs notifications instead of sending them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl HostNotifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            endpoint = notification.endpoint(),
            payload = %notification.payload(),
            "notification (dry run)"
        );
    }
}

/// Keeps every notification in memory, for tests and tooling.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notifications sent to one endpoint.
    #[must_use]
    pub fn sent_to(&self, endpoint: &str) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| n.endpoint() == endpoint)
            .collect()
    }
}

impl HostNotifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
