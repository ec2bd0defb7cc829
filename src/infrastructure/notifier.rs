use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::ports::{OrderNotification, OrderNotifier};

/// Posts order notifications to the SMS gateway function.
pub struct HttpOrderNotifier {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpOrderNotifier {
    pub fn new(url: String, token: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Remote(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client, url, token })
    }
}

#[async_trait]
impl OrderNotifier for HttpOrderNotifier {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), DomainError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(notification)
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("notification request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Remote(format!(
                "notification gateway returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}

/// Used when no gateway is configured: the notification only reaches the log.
pub struct LogOnlyNotifier;

#[async_trait]
impl OrderNotifier for LogOnlyNotifier {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), DomainError> {
        log::info!(
            "Notification gateway not configured; order #{} for {} not sent",
            notification.order_id,
            notification.client_name
        );
        Ok(())
    }
}
