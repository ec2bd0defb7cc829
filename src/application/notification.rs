use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::domain::ports::{OrderNotification, OrderNotifier};

/// Sends notifications in the background; the outcome is only logged.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn OrderNotifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { notifier }
    }

    /// Spawn one delivery attempt. Returns `None` when called outside a tokio
    /// runtime, in which case nothing is sent.
    pub fn dispatch(&self, notification: OrderNotification) -> Option<JoinHandle<bool>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!(
                    "No runtime available; notification for order #{} dropped",
                    notification.order_id
                );
                return None;
            }
        };

        let notifier = Arc::clone(&self.notifier);
        Some(handle.spawn(async move {
            match notifier.notify(&notification).await {
                Ok(()) => {
                    log::info!("Order #{} notification sent", notification.order_id);
                    true
                }
                Err(e) => {
                    log::warn!(
                        "Order #{} notification failed: {}",
                        notification.order_id,
                        e
                    );
                    false
                }
            }
        }))
    }
}
