//! Bandwidth Change Aggregate Root
//!
//! An audited record of a bandwidth modification against a live instance.
//! Applying a change is coordinated by the use case layer: the record itself
//! holds only the target instance's id, never a back-pointer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{
    Bandwidth, ChangeId, DomainError, InstanceId, Money, Timestamp, UserId, WorkflowId,
};

/// Bandwidth change status.
///
/// Lifecycle: `PENDING -> SCHEDULED -> APPLIED`, with cancellation allowed
/// until the change is applied and failure from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    /// Recorded, awaiting scheduling or immediate application.
    Pending,
    /// Scheduled for a future maintenance window.
    Scheduled,
    /// Applied to the target instance.
    Applied,
    /// Failed before or during application.
    Failed,
    /// Cancelled before application.
    Cancelled,
}

impl ChangeStatus {
    /// Returns true if the change has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Applied | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the change can still be cancelled.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled)
    }

    /// Returns true if the change can be applied.
    #[must_use]
    pub const fn can_apply(&self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Scheduled => write!(f, "SCHEDULED"),
            Self::Applied => write!(f, "APPLIED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Parameters for reconstituting a BandwidthChange from storage.
#[derive(Debug, Clone)]
pub struct ReconstitutedChangeParams {
    /// Change identifier.
    pub id: ChangeId,
    /// Target instance.
    pub instance_id: InstanceId,
    /// Acting user.
    pub user_id: UserId,
    /// Bandwidth before the change.
    pub previous_bandwidth: Bandwidth,
    /// Bandwidth after the change.
    pub new_bandwidth: Bandwidth,
    /// Optional reason supplied by the requester.
    pub change_reason: Option<String>,
    /// Scheduling timestamp.
    pub scheduled_at: Option<Timestamp>,
    /// Application timestamp.
    pub applied_at: Option<Timestamp>,
    /// Current status.
    pub status: ChangeStatus,
    /// Signed monthly-cost impact.
    pub cost_impact: Money,
    /// Opaque external workflow reference.
    pub workflow_id: Option<WorkflowId>,
    /// Stored optimistic-concurrency version.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Bandwidth Change Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandwidthChange {
    id: ChangeId,
    instance_id: InstanceId,
    user_id: UserId,
    previous_bandwidth: Bandwidth,
    new_bandwidth: Bandwidth,
    change_reason: Option<String>,
    scheduled_at: Option<Timestamp>,
    applied_at: Option<Timestamp>,
    status: ChangeStatus,
    cost_impact: Money,
    workflow_id: Option<WorkflowId>,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl BandwidthChange {
    /// Record a requested bandwidth modification in `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns error if the new bandwidth is below 1 Mbps.
    pub fn request(
        instance_id: InstanceId,
        user_id: UserId,
        previous_bandwidth: Bandwidth,
        new_bandwidth: Bandwidth,
        cost_impact: Money,
        change_reason: Option<String>,
    ) -> Result<Self, DomainError> {
        new_bandwidth.validate()?;

        let now = Timestamp::now();
        Ok(Self {
            id: ChangeId::generate(),
            instance_id,
            user_id,
            previous_bandwidth,
            new_bandwidth,
            change_reason,
            scheduled_at: None,
            applied_at: None,
            status: ChangeStatus::Pending,
            cost_impact,
            workflow_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a change from stored state.
    #[must_use]
    pub fn reconstitute(params: ReconstitutedChangeParams) -> Self {
        Self {
            id: params.id,
            instance_id: params.instance_id,
            user_id: params.user_id,
            previous_bandwidth: params.previous_bandwidth,
            new_bandwidth: params.new_bandwidth,
            change_reason: params.change_reason,
            scheduled_at: params.scheduled_at,
            applied_at: params.applied_at,
            status: params.status,
            cost_impact: params.cost_impact,
            workflow_id: params.workflow_id,
            version: params.version,
            created_at: params.created_at,
            updated_at: params.updated_at,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the change ID.
    #[must_use]
    pub const fn id(&self) -> &ChangeId {
        &self.id
    }

    /// Get the target instance.
    #[must_use]
    pub const fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Get the acting user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the bandwidth before the change.
    #[must_use]
    pub const fn previous_bandwidth(&self) -> Bandwidth {
        self.previous_bandwidth
    }

    /// Get the bandwidth after the change.
    #[must_use]
    pub const fn new_bandwidth(&self) -> Bandwidth {
        self.new_bandwidth
    }

    /// Get the requester's reason.
    #[must_use]
    pub fn change_reason(&self) -> Option<&str> {
        self.change_reason.as_deref()
    }

    /// Get the scheduling timestamp.
    #[must_use]
    pub const fn scheduled_at(&self) -> Option<Timestamp> {
        self.scheduled_at
    }

    /// Get the application timestamp.
    #[must_use]
    pub const fn applied_at(&self) -> Option<Timestamp> {
        self.applied_at
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> ChangeStatus {
        self.status
    }

    /// Get the signed monthly-cost impact.
    #[must_use]
    pub const fn cost_impact(&self) -> Money {
        self.cost_impact
    }

    /// Get the opaque external workflow reference.
    #[must_use]
    pub const fn workflow_id(&self) -> Option<&WorkflowId> {
        self.workflow_id.as_ref()
    }

    /// Get the stored optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Set the stored version. Called by repository adapters on save.
    pub const fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether this change raises the bandwidth.
    #[must_use]
    pub fn is_increase(&self) -> bool {
        self.new_bandwidth > self.previous_bandwidth
    }

    /// Whether this change lowers the bandwidth.
    #[must_use]
    pub fn is_decrease(&self) -> bool {
        self.new_bandwidth < self.previous_bandwidth
    }

    /// Signed difference between new and previous bandwidth, in Mbps.
    #[must_use]
    pub const fn bandwidth_difference(&self) -> i64 {
        self.new_bandwidth.difference(self.previous_bandwidth)
    }

    /// Whether this change can still be cancelled.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// Whether this change was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.status == ChangeStatus::Applied
    }

    /// Attach the external workflow reference (opaque passthrough).
    pub fn set_workflow_id(&mut self, workflow_id: WorkflowId) {
        self.workflow_id = Some(workflow_id);
        self.updated_at = Timestamp::now();
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Schedule the change for a maintenance window.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the change is PENDING.
    pub fn schedule(&mut self, at: Timestamp) -> Result<(), DomainError> {
        if self.status != ChangeStatus::Pending {
            return Err(DomainError::invalid_state(
                "BandwidthChange",
                self.status,
                "schedule",
            ));
        }
        self.scheduled_at = Some(at);
        self.status = ChangeStatus::Scheduled;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Mark the change applied, returning the bandwidth the coordinating use
    /// case must push through `ServiceInstance::update_bandwidth`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the change is PENDING or
    /// SCHEDULED.
    pub fn apply(&mut self) -> Result<Bandwidth, DomainError> {
        if !self.status.can_apply() {
            return Err(DomainError::invalid_state(
                "BandwidthChange",
                self.status,
                "apply",
            ));
        }
        let now = Timestamp::now();
        self.applied_at = Some(now);
        self.status = ChangeStatus::Applied;
        self.updated_at = now;
        Ok(self.new_bandwidth)
    }

    /// Cancel the change.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the change is PENDING or
    /// SCHEDULED.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.can_cancel() {
            return Err(DomainError::invalid_state(
                "BandwidthChange",
                self.status,
                "cancel",
            ));
        }
        self.status = ChangeStatus::Cancelled;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Fail the change.
    ///
    /// Returns whether the transition applied; failing an already-terminal
    /// change is a logged no-op.
    pub fn fail(&mut self) -> bool {
        if self.status.is_terminal() {
            tracing::warn!(
                change_id = %self.id,
                status = %self.status,
                "refusing fail: bandwidth change is already terminal"
            );
            return false;
        }
        self.status = ChangeStatus::Failed;
        self.updated_at = Timestamp::now();
        true
    }
}
