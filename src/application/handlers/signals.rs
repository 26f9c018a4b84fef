//! Side-effect signals emitted by state transitions.
//!
//! Handlers collect cache-invalidation targets and notifications while
//! mutating state, then dispatch them after the store write committed.
//! Dispatch is best-effort: a failing dependency downgrades the result
//! to partial success and is logged, never rolled back.

use std::sync::Arc;

use crate::ports::{CacheInvalidator, Notification, NotificationSink};

/// Signals accumulated during a state transition.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    cache_paths: Vec<String>,
    notifications: Vec<Notification>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self, path: impl Into<String>) {
        self.cache_paths.push(path.into());
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn is_empty(&self) -> bool {
        self.cache_paths.is_empty() && self.notifications.is_empty()
    }

    pub fn cache_paths(&self) -> &[String] {
        &self.cache_paths
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

/// Dispatches signals against the cache and notification ports.
pub struct SignalDispatcher {
    cache: Arc<dyn CacheInvalidator>,
    sink: Arc<dyn NotificationSink>,
}

impl SignalDispatcher {
    pub fn new(cache: Arc<dyn CacheInvalidator>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { cache, sink }
    }

    /// Attempts every signal and returns `true` only if all succeeded.
    /// Failures are logged with the target that failed.
    pub async fn dispatch(&self, signals: Signals) -> bool {
        let mut all_delivered = true;

        // Cache targets are independent; invalidate them concurrently.
        let invalidations = signals
            .cache_paths
            .iter()
            .map(|path| self.cache.invalidate(path));
        for (path, result) in signals
            .cache_paths
            .iter()
            .zip(futures::future::join_all(invalidations).await)
        {
            if let Err(e) = result {
                tracing::warn!(path = %path, error = %e, "cache invalidation failed");
                all_delivered = false;
            }
        }

        for notification in &signals.notifications {
            if let Err(e) = self.sink.send(notification).await {
                tracing::warn!(to = %notification.to, error = %e, "notification delivery failed");
                all_delivered = false;
            }
        }

        all_delivered
    }
}
