//! Notification Transport
//!
//! Implements the `NotificationPublisher` port from `domain_claims` with an
//! in-process hub of `tokio::sync::broadcast` channels, one per topic. The
//! HTTP layer turns subscriptions into Server-Sent Event streams.

pub mod hub;

pub use hub::{BroadcastHub, DEFAULT_CHANNEL_CAPACITY};
