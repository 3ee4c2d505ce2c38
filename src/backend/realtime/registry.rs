/**
 * Session Registry
 *
 * Tracks every open notification socket and the topics it subscribed to.
 * Each entry also holds the sending half of the session's outbound queue,
 * so the notifier can push frames without touching the socket itself.
 *
 * # Lifecycle
 *
 * An entry is created once by `on_connect` and removed once by
 * `on_disconnect`. Subscription changes on a session that is not
 * registered are rejected with `RegistryError::NotConnected` and leave
 * the map untouched.
 *
 * # Thread Safety
 *
 * The map sits behind a single `tokio::sync::RwLock`. Session and topic
 * counts are small, so one lock is enough; no lock is held while frames
 * are delivered.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Sending half of a session's outbound frame queue
pub type Outbound = mpsc::UnboundedSender<String>;

/// Opaque identity of one socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WebSocket close code observed when a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseStatus(pub u16);

impl CloseStatus {
    pub const NORMAL: Self = Self(1000);
    pub const GOING_AWAY: Self = Self(1001);
    /// Close frame without a status code
    pub const NO_STATUS: Self = Self(1005);
    /// Transport dropped without a close frame
    pub const ABNORMAL: Self = Self(1006);

    /// Normal closure and going-away are the only expected endings
    pub fn is_expected(&self) -> bool {
        *self == Self::NORMAL || *self == Self::GOING_AWAY
    }
}

impl fmt::Display for CloseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("session {0} is already registered")]
    AlreadyConnected(SessionId),

    #[error("session {0} is not registered")]
    NotConnected(SessionId),
}

struct SessionEntry {
    topics: HashSet<String>,
    outbound: Outbound,
}

/// Shared map of live sessions to their subscriptions
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session with no subscriptions
    pub async fn on_connect(&self, id: SessionId, outbound: Outbound) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            tracing::error!("[Registry] Session {} connected twice", id);
            return Err(RegistryError::AlreadyConnected(id));
        }
        sessions.insert(
            id,
            SessionEntry {
                topics: HashSet::new(),
                outbound,
            },
        );
        tracing::info!("[Registry] Session {} connected ({} open)", id, sessions.len());
        Ok(())
    }

    /// Remove a session and everything it subscribed to
    ///
    /// Returns `false` when the session was not registered.
    pub async fn on_disconnect(&self, id: SessionId, status: CloseStatus) -> bool {
        let removed = self.sessions.write().await.remove(&id);

        let Some(entry) = removed else {
            tracing::warn!("[Registry] Disconnect for unknown session {}", id);
            return false;
        };

        if status.is_expected() {
            tracing::info!(
                "[Registry] Session {} closed with {} ({} subscriptions dropped)",
                id,
                status,
                entry.topics.len()
            );
        } else {
            tracing::warn!(
                "[Registry] Session {} closed abnormally with status {}",
                id,
                status
            );
        }
        true
    }

    /// Add a topic to a session; returns whether the set changed
    pub async fn subscribe(&self, id: SessionId, topic: &str) -> Result<bool, RegistryError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(RegistryError::NotConnected(id))?;
        let added = entry.topics.insert(topic.to_string());
        tracing::debug!("[Registry] Session {} subscribed to {} (new: {})", id, topic, added);
        Ok(added)
    }

    /// Remove a topic from a session; returns whether the set changed
    pub async fn unsubscribe(&self, id: SessionId, topic: &str) -> Result<bool, RegistryError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(RegistryError::NotConnected(id))?;
        let removed = entry.topics.remove(topic);
        tracing::debug!("[Registry] Session {} unsubscribed from {} (was subscribed: {})", id, topic, removed);
        Ok(removed)
    }

    /// Snapshot of a session's subscriptions, `None` if not registered
    pub async fn subscriptions(&self, id: SessionId) -> Option<HashSet<String>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| entry.topics.clone())
    }

    /// Sessions currently subscribed to `topic`, with their outbound queues
    pub async fn subscribers(&self, topic: &str) -> Vec<(SessionId, Outbound)> {
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.topics.contains(topic))
            .map(|(id, entry)| (*id, entry.outbound.clone()))
            .collect()
    }

    pub async fn is_connected(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
