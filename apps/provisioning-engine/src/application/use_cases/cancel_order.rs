//! Cancel Order Use Case

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, IdentityContext};
use crate::config::EngineConfig;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::Order;
use crate::domain::shared::{DomainError, OrderId};

/// Use case for customer-initiated order cancellation.
pub struct CancelOrderUseCase<O, E>
where
    O: OrderRepository,
    E: EventPublisherPort,
{
    order_repo: Arc<O>,
    event_publisher: Arc<E>,
    config: EngineConfig,
}

impl<O, E> CancelOrderUseCase<O, E>
where
    O: OrderRepository,
    E: EventPublisherPort,
{
    /// Create a new `CancelOrderUseCase`.
    pub const fn new(order_repo: Arc<O>, event_publisher: Arc<E>, config: EngineConfig) -> Self {
        Self {
            order_repo,
            event_publisher,
            config,
        }
    }

    /// Cancel an order owned by the calling company.
    ///
    /// Retries the read-modify-write when a concurrent writer wins the
    /// versioned save, up to the configured limit.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order does not exist, `Forbidden` if it belongs to
    /// another company, `InvalidState` if it is past the cancellable states,
    /// `Conflict` if the retries are exhausted.
    pub async fn execute(
        &self,
        identity: &IdentityContext,
        order_id: &OrderId,
    ) -> Result<Order, DomainError> {
        tracing::info!(order_id = %order_id, "cancelling order");

        let mut attempts = 0;
        loop {
            let mut order = self
                .order_repo
                .find_by_id(order_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Order", order_id))?;

            if order.company_id() != &identity.company_id {
                return Err(DomainError::forbidden("Order", order_id));
            }

            order.cancel()?;

            match self.order_repo.save(&mut order).await {
                Ok(()) => {
                    let events = order.drain_events();
                    if let Err(e) = self.event_publisher.publish_order_events(events).await {
                        tracing::error!("Failed to publish cancel events: {}", e);
                    }
                    tracing::info!(order_number = %order.order_number(), "order cancelled");
                    return Ok(order);
                }
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        order_id = %order_id,
                        attempt = attempts,
                        "cancel lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
