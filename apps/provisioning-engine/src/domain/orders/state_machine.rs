//! Order State Machine Service
//!
//! Validates order status transitions.

use crate::domain::orders::value_objects::OrderStatus;
use crate::domain::shared::DomainError;

/// Order state machine for validating transitions.
///
/// The aggregate's transition methods enforce these rules themselves; this
/// service exists so callers (operator tooling, the processing use case) can
/// check legality without mutating anything.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        if to == OrderStatus::Failed {
            // Failure is reachable from any non-terminal state.
            return !from.is_terminal();
        }

        matches!(
            (from, to),
            (OrderStatus::Submitted, OrderStatus::Approved)
                | (OrderStatus::Approved, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (
                    OrderStatus::Submitted | OrderStatus::Approved,
                    OrderStatus::Cancelled
                )
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), DomainError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::invalid_state(
                "Order",
                from,
                &format!("transition to {to}"),
            ))
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::Submitted => vec![
                OrderStatus::Approved,
                OrderStatus::Cancelled,
                OrderStatus::Failed,
            ],
            OrderStatus::Approved => vec![
                OrderStatus::InProgress,
                OrderStatus::Cancelled,
                OrderStatus::Failed,
            ],
            OrderStatus::InProgress => vec![OrderStatus::Completed, OrderStatus::Failed],
            // Terminal states
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Failed => vec![],
        }
    }
}
