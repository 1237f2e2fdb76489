use serde_json::json;
use tracing::warn;

use crate::domain::entities::contact::ContactMessage;

/// Pushes new contact messages to an optional webhook. Delivery is
/// fire-and-forget; a failure never affects the API response.
#[derive(Clone)]
pub struct ContactNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl ContactNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        ContactNotifier {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub fn notify(&self, message: &ContactMessage) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };

        let payload = json!({
            "event": "contact.message.received",
            "message_id": message.id,
            "name": message.name,
            "email": message.email,
            "subject": message.subject,
        });
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = client.post(&url).json(&payload).send().await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    warn!("Contact webhook returned {}", resp.status());
                }
                Err(e) => warn!("Contact webhook delivery failed: {}", e),
                _ => {}
            }
        });
    }
}
