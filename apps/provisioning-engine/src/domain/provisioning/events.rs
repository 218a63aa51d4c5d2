//! Service instance domain events.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Bandwidth, InstanceId, Money, Timestamp};

/// An instance went live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceProvisioned {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// Bandwidth the instance went live with.
    pub bandwidth: Bandwidth,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An instance's billed bandwidth changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandwidthUpdated {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// Bandwidth before the change.
    pub previous_bandwidth: Bandwidth,
    /// Bandwidth after the change.
    pub new_bandwidth: Bandwidth,
    /// Recomputed monthly cost.
    pub monthly_cost: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An instance was suspended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSuspended {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// A suspended instance went back into service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceReactivated {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// An instance was terminated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceTerminated {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Events emitted by the service instance aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstanceEvent {
    /// Instance went live.
    Provisioned(InstanceProvisioned),
    /// Billed bandwidth changed.
    BandwidthUpdated(BandwidthUpdated),
    /// Instance suspended.
    Suspended(InstanceSuspended),
    /// Instance reactivated.
    Reactivated(InstanceReactivated),
    /// Instance terminated.
    Terminated(InstanceTerminated),
}

impl InstanceEvent {
    /// The instance this event belongs to.
    #[must_use]
    pub const fn instance_id(&self) -> &InstanceId {
        match self {
            Self::Provisioned(e) => &e.instance_id,
            Self::BandwidthUpdated(e) => &e.instance_id,
            Self::Suspended(e) => &e.instance_id,
            Self::Reactivated(e) => &e.instance_id,
            Self::Terminated(e) => &e.instance_id,
        }
    }
}
