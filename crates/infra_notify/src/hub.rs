//! Broadcast hub
//!
//! Channels are created on first subscribe and pruned once their last
//! receiver is dropped. A subscriber that falls more than `capacity`
//! messages behind skips the ones it missed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use core_kernel::{DomainPort, PortError};
use domain_claims::{Notification, NotificationChannel, NotificationPublisher};

/// Buffered messages per channel when no capacity is configured
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Named-channel fan-out hub
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    capacity: usize,
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<Notification>>>>,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl BroadcastHub {
    /// Creates a hub whose channels buffer `capacity` messages
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribes to a channel, creating it if needed
    pub async fn subscribe(&self, channel: NotificationChannel) -> broadcast::Receiver<Notification> {
        let topic = channel.topic();
        let mut channels = self.channels.write().await;
        let receiver = match channels.get(&topic) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(self.capacity);
                channels.insert(topic.clone(), sender);
                receiver
            }
        };
        debug!(%topic, "Subscriber attached");
        receiver
    }

    /// Subscribes to a channel as a stream of notifications
    ///
    /// Lagged gaps are logged and skipped rather than ending the stream.
    pub async fn subscribe_stream(
        &self,
        channel: NotificationChannel,
    ) -> impl Stream<Item = Notification> + Send + 'static {
        let topic = channel.topic();
        BroadcastStream::new(self.subscribe(channel).await).filter_map(move |result| match result {
            Ok(notification) => Some(notification),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(%topic, skipped, "Subscriber lagged, dropping missed notifications");
                None
            }
        })
    }

    /// Number of live receivers on a channel
    pub async fn subscriber_count(&self, channel: NotificationChannel) -> usize {
        self.channels
            .read()
            .await
            .get(&channel.topic())
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Number of channels with a sender registered
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    async fn prune(&self) {
        self.channels
            .write()
            .await
            .retain(|_, sender| sender.receiver_count() > 0);
    }
}

impl DomainPort for BroadcastHub {}

#[async_trait]
impl NotificationPublisher for BroadcastHub {
    async fn publish(
        &self,
        channel: NotificationChannel,
        notification: Notification,
    ) -> Result<usize, PortError> {
        let topic = channel.topic();
        let sender = self.channels.read().await.get(&topic).cloned();

        let Some(sender) = sender else {
            debug!(%topic, "No subscribers, notification dropped");
            return Ok(0);
        };

        match sender.send(notification) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                // no live receivers left on this channel
                self.prune().await;
                Ok(0)
            }
        }
    }
}
