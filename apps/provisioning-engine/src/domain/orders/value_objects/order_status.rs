//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// Lifecycle: `SUBMITTED -> APPROVED -> IN_PROGRESS -> COMPLETED`, with
/// cancellation allowed before processing starts and failure from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order received, awaiting approval.
    Submitted,
    /// Order approved, awaiting provisioning.
    Approved,
    /// Provisioning in progress.
    InProgress,
    /// Order fulfilled.
    Completed,
    /// Order cancelled before processing started.
    Cancelled,
    /// Order failed during processing.
    Failed,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Returns true if the order is still in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the order can still be cancelled.
    ///
    /// Cancellation is only allowed before provisioning work begins.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        matches!(self, Self::Submitted | Self::Approved)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "SUBMITTED"),
            Self::Approved => write!(f, "APPROVED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}
