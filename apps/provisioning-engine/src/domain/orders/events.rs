//! Order domain events.

use serde::{Deserialize, Serialize};

use crate::domain::orders::value_objects::OrderType;
use crate::domain::shared::{Money, OrderId, OrderNumber, Timestamp};

/// An order was submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmitted {
    /// Order identifier.
    pub order_id: OrderId,
    /// Allocated order number.
    pub order_number: OrderNumber,
    /// Order type.
    pub order_type: OrderType,
    /// Computed total cost.
    pub total_cost: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An order was approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderApproved {
    /// Order identifier.
    pub order_id: OrderId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Provisioning work started on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProcessingStarted {
    /// Order identifier.
    pub order_id: OrderId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An order completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCompleted {
    /// Order identifier.
    pub order_id: OrderId,
    /// Order type, so subscribers can react to the completion effect.
    pub order_type: OrderType,
    /// Completion date stamped on the order.
    pub completed_on: chrono::NaiveDate,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An order was cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Order identifier.
    pub order_id: OrderId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An order failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFailed {
    /// Order identifier.
    pub order_id: OrderId,
    /// Failure reason appended to the order notes.
    pub reason: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Events emitted by the order aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
    /// Order submitted.
    Submitted(OrderSubmitted),
    /// Order approved.
    Approved(OrderApproved),
    /// Processing started.
    ProcessingStarted(OrderProcessingStarted),
    /// Order completed.
    Completed(OrderCompleted),
    /// Order cancelled.
    Cancelled(OrderCancelled),
    /// Order failed.
    Failed(OrderFailed),
}

impl OrderEvent {
    /// The order this event belongs to.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Submitted(e) => &e.order_id,
            Self::Approved(e) => &e.order_id,
            Self::ProcessingStarted(e) => &e.order_id,
            Self::Completed(e) => &e.order_id,
            Self::Cancelled(e) => &e.order_id,
            Self::Failed(e) => &e.order_id,
        }
    }
}
