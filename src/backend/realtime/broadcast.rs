/**
 * Update Notification Fan-out
 *
 * The `Notifier` turns "this listing changed" into one `UPDATE` frame per
 * subscribed session. Frames are queued on each session's outbound
 * channel; the socket writer task of that session does the actual send.
 *
 * Delivery is best effort and independent per session: a session whose
 * queue is already closed is logged and skipped, and the caller that
 * triggered the notification never sees the failure.
 */

use crate::backend::realtime::registry::SessionRegistry;
use crate::shared::{ResourceKind, ServerMessage};

/// Pushes `UPDATE` frames to subscribed sessions
#[derive(Clone)]
pub struct Notifier {
    registry: SessionRegistry,
}

impl Notifier {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    /// Notify every session subscribed to `topic`
    ///
    /// # Returns
    ///
    /// Number of sessions the frame was queued for
    pub async fn notify(&self, topic: impl AsRef<str>) -> usize {
        let topic = topic.as_ref();
        let subscribers = self.registry.subscribers(topic).await;
        if subscribers.is_empty() {
            tracing::debug!("[Notify] No subscribers for {}", topic);
            return 0;
        }

        let frame = ServerMessage::update(topic).encode();
        let mut delivered = 0;
        for (id, outbound) in subscribers {
            match outbound.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::warn!("[Notify] Session {} is gone, skipping UPDATE for {}", id, topic);
                }
            }
        }

        tracing::info!("[Notify] UPDATE {} queued for {} sessions", topic, delivered);
        delivered
    }

    /// Notify every topic affected by a change to `kind`
    pub async fn notify_resource(&self, kind: ResourceKind) -> usize {
        let mut delivered = 0;
        for topic in kind.topics() {
            delivered += self.notify(topic).await;
        }
        delivered
    }
}
