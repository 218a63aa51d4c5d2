//! Event publisher port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::orders::OrderEvent;
use crate::domain::provisioning::InstanceEvent;

/// Errors that can occur when publishing domain events.
#[derive(Debug, Error)]
pub enum EventPublishError {
    /// The downstream sink rejected the events.
    #[error("Failed to publish events: {0}")]
    PublishFailed(String),
}

/// Sink for domain events drained from aggregates after a successful save.
///
/// Publishing is best-effort: use cases log a failed publish and carry on,
/// they never roll back a committed state change because of it.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish order lifecycle events.
    ///
    /// # Errors
    ///
    /// Returns error if the sink rejects the events.
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), EventPublishError>;

    /// Publish service instance lifecycle events.
    ///
    /// # Errors
    ///
    /// Returns error if the sink rejects the events.
    async fn publish_instance_events(
        &self,
        events: Vec<InstanceEvent>,
    ) -> Result<(), EventPublishError>;
}

/// Event publisher that discards everything. Default wiring for tests and
/// deployments without a downstream consumer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), EventPublishError> {
        tracing::debug!(count = events.len(), "discarding order events");
        Ok(())
    }

    async fn publish_instance_events(
        &self,
        events: Vec<InstanceEvent>,
    ) -> Result<(), EventPublishError> {
        tracing::debug!(count = events.len(), "discarding instance events");
        Ok(())
    }
}
