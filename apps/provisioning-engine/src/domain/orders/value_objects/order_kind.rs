//! Order type and the per-type payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Bandwidth, DomainError, InstanceId};

/// Order type discriminant, as persisted and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Provision a new service instance.
    NewService,
    /// Change the bandwidth of an existing instance.
    ModifyService,
    /// Terminate an existing instance.
    TerminateService,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewService => write!(f, "NEW_SERVICE"),
            Self::ModifyService => write!(f, "MODIFY_SERVICE"),
            Self::TerminateService => write!(f, "TERMINATE_SERVICE"),
        }
    }
}

/// Order type together with its required fields.
///
/// Each variant carries exactly the fields its type requires, so an order
/// request cannot be constructed with a bandwidth on a termination or
/// without a target instance on a modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "order_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Provision a new service instance at the requested bandwidth.
    NewService {
        /// Bandwidth to provision.
        requested_bandwidth: Bandwidth,
    },
    /// Change an existing instance to the requested bandwidth.
    ModifyService {
        /// Instance to modify.
        instance_id: InstanceId,
        /// Bandwidth to change to.
        requested_bandwidth: Bandwidth,
    },
    /// Terminate an existing instance.
    TerminateService {
        /// Instance to terminate.
        instance_id: InstanceId,
    },
}

impl OrderKind {
    /// The persisted discriminant for this kind.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        match self {
            Self::NewService { .. } => OrderType::NewService,
            Self::ModifyService { .. } => OrderType::ModifyService,
            Self::TerminateService { .. } => OrderType::TerminateService,
        }
    }

    /// Requested bandwidth; absent for terminations.
    #[must_use]
    pub const fn requested_bandwidth(&self) -> Option<Bandwidth> {
        match self {
            Self::NewService {
                requested_bandwidth,
            }
            | Self::ModifyService {
                requested_bandwidth,
                ..
            } => Some(*requested_bandwidth),
            Self::TerminateService { .. } => None,
        }
    }

    /// Target service instance; absent for new-service orders.
    #[must_use]
    pub const fn instance_id(&self) -> Option<&InstanceId> {
        match self {
            Self::NewService { .. } => None,
            Self::ModifyService { instance_id, .. } | Self::TerminateService { instance_id } => {
                Some(instance_id)
            }
        }
    }

    /// Validate the per-type fields.
    ///
    /// # Errors
    ///
    /// Returns error if a carried bandwidth is below 1 Mbps.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(bandwidth) = self.requested_bandwidth() {
            bandwidth.validate()?;
        }
        Ok(())
    }
}
