//! Orders Bounded Context
//!
//! Manages the order lifecycle from submission to completion, cancellation
//! or failure, including order-type-specific validation and monotonic order
//! numbering.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: The root entity managing order state transitions
//! - **OrderKind**: Tagged variant carrying the per-type required fields
//! - **Domain Events**: Capturing all state transitions

pub mod aggregate;
pub mod events;
pub mod repository;
pub mod state_machine;
pub mod value_objects;

pub use aggregate::{Order, ReconstitutedOrderParams, SubmitOrderCommand};
pub use events::{
    OrderApproved, OrderCancelled, OrderCompleted, OrderEvent, OrderFailed,
    OrderProcessingStarted, OrderSubmitted,
};
pub use repository::OrderRepository;
pub use state_machine::OrderStateMachine;
pub use value_objects::{OrderKind, OrderStatus, OrderType};
