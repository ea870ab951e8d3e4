//! Notification dispatch
//!
//! Lifecycle events are pushed to named channels: one per user plus a shared
//! admin channel. Delivery is fire-and-forget. Only subscribers connected at
//! publish time see a message and nothing is stored or retried.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{DomainPort, PortError, UserId};

/// Topic of the shared admin channel
pub const ADMIN_TOPIC: &str = "/topic/admin";

/// Topic prefix of per-user channels
pub const USER_TOPIC_PREFIX: &str = "/topic/user/";

/// Destination of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationChannel {
    /// A single user's channel
    User(UserId),
    /// The channel every admin listens on
    Admins,
}

impl NotificationChannel {
    /// Transport topic name
    pub fn topic(&self) -> String {
        match self {
            NotificationChannel::User(id) => format!("{}{}", USER_TOPIC_PREFIX, id.as_uuid()),
            NotificationChannel::Admins => ADMIN_TOPIC.to_string(),
        }
    }
}

/// Payload delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification stamped with the current time
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Publish side of the notification transport
#[async_trait]
pub trait NotificationPublisher: DomainPort {
    /// Publishes to a channel
    ///
    /// # Returns
    ///
    /// Number of subscribers that received the message; zero when nobody is
    /// listening
    async fn publish(
        &self,
        channel: NotificationChannel,
        notification: Notification,
    ) -> Result<usize, PortError>;
}

/// Best-effort dispatcher used by the claim lifecycle
///
/// Publish failures are logged and swallowed so they never fail the
/// operation that triggered them.
#[derive(Clone)]
pub struct NotificationDispatcher {
    publisher: Arc<dyn NotificationPublisher>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over a publisher
    pub fn new(publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self { publisher }
    }

    /// Notifies a single user
    pub async fn notify_user(&self, user_id: UserId, message: impl Into<String>) {
        self.dispatch(NotificationChannel::User(user_id), message.into()).await;
    }

    /// Notifies every connected admin
    pub async fn notify_admins(&self, message: impl Into<String>) {
        self.dispatch(NotificationChannel::Admins, message.into()).await;
    }

    async fn dispatch(&self, channel: NotificationChannel, message: String) {
        let topic = channel.topic();
        match self.publisher.publish(channel, Notification::new(message)).await {
            Ok(receivers) => debug!(%topic, receivers, "Notification published"),
            Err(e) => warn!(%topic, error = %e, "Failed to publish notification"),
        }
    }
}

/// Recording publisher for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use tokio::sync::RwLock;

    /// Publisher that records every message it is given
    #[derive(Debug, Default, Clone)]
    pub struct RecordingPublisher {
        sent: Arc<RwLock<Vec<(NotificationChannel, Notification)>>>,
        failing: bool,
    }

    impl RecordingPublisher {
        /// Creates a publisher that accepts everything
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a publisher whose every publish fails
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        /// Everything published so far, in order
        pub async fn sent(&self) -> Vec<(NotificationChannel, Notification)> {
            self.sent.read().await.clone()
        }

        /// Messages published to one channel, in order
        pub async fn messages_for(&self, channel: NotificationChannel) -> Vec<String> {
            self.sent
                .read()
                .await
                .iter()
                .filter(|(c, _)| *c == channel)
                .map(|(_, n)| n.message.clone())
                .collect()
        }
    }

    impl DomainPort for RecordingPublisher {}

    #[async_trait]
    impl NotificationPublisher for RecordingPublisher {
        async fn publish(
            &self,
            channel: NotificationChannel,
            notification: Notification,
        ) -> Result<usize, PortError> {
            if self.failing {
                return Err(PortError::connection("notification transport unavailable"));
            }
            self.sent.write().await.push((channel, notification));
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingPublisher;
    use super::*;

    #[test]
    fn test_topics() {
        let id = UserId::new();
        assert_eq!(
            NotificationChannel::User(id).topic(),
            format!("/topic/user/{}", id.as_uuid())
        );
        assert_eq!(NotificationChannel::Admins.topic(), "/topic/admin");
    }

    #[tokio::test]
    async fn test_dispatcher_routes_by_channel() {
        let publisher = RecordingPublisher::new();
        let dispatcher = NotificationDispatcher::new(Arc::new(publisher.clone()));
        let user = UserId::new();

        dispatcher.notify_user(user, "hello").await;
        dispatcher.notify_admins("heads up").await;

        assert_eq!(publisher.messages_for(NotificationChannel::User(user)).await, vec!["hello"]);
        assert_eq!(publisher.messages_for(NotificationChannel::Admins).await, vec!["heads up"]);
    }

    #[tokio::test]
    async fn test_dispatcher_swallows_failures() {
        let publisher = RecordingPublisher::failing();
        let dispatcher = NotificationDispatcher::new(Arc::new(publisher.clone()));

        dispatcher.notify_user(UserId::new(), "lost").await;

        assert!(publisher.sent().await.is_empty());
    }

    #[test]
    fn test_notification_wire_shape() {
        let json = serde_json::to_value(Notification::new("ping")).unwrap();
        assert_eq!(json["message"], "ping");
        assert!(json["timestamp"].is_string());
    }
}
