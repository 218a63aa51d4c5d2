//! Order Aggregate Root
//!
//! The Order aggregate manages an order's lifecycle from submission through
//! completion, cancellation or failure. Type-specific validation happens at
//! the command boundary via [`OrderKind`]; pricing and catalog checks happen
//! in the submit use case before the command is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::orders::events::{
    OrderApproved, OrderCancelled, OrderCompleted, OrderEvent, OrderFailed,
    OrderProcessingStarted, OrderSubmitted,
};
use crate::domain::orders::value_objects::{OrderKind, OrderStatus, OrderType};
use crate::domain::shared::{
    Bandwidth, CompanyId, DomainError, InstanceId, Money, OrderId, OrderNumber, ServiceId,
    Timestamp, UserId, WorkflowId,
};

/// Command to submit a new order.
///
/// Built by the submit use case after catalog validation, cost calculation
/// and order-number allocation.
#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    /// Company placing the order.
    pub company_id: CompanyId,
    /// User placing the order.
    pub user_id: UserId,
    /// Catalog service being ordered.
    pub service_id: ServiceId,
    /// Order type with its per-type fields.
    pub kind: OrderKind,
    /// Allocated order number.
    pub order_number: OrderNumber,
    /// Computed total cost (signed; negative for bandwidth decreases).
    pub total_cost: Money,
    /// Date the customer asked for.
    pub requested_date: NaiveDate,
    /// Derived completion estimate.
    pub estimated_completion_date: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl SubmitOrderCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the per-type fields are invalid.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.kind.validate()
    }
}

/// Parameters for reconstituting an Order from storage.
///
/// Used by repositories to rebuild aggregates from persisted state.
/// No domain events are generated during reconstitution.
#[derive(Debug, Clone)]
pub struct ReconstitutedOrderParams {
    /// Order identifier.
    pub id: OrderId,
    /// Company that placed the order.
    pub company_id: CompanyId,
    /// User that placed the order.
    pub user_id: UserId,
    /// Catalog service ordered.
    pub service_id: ServiceId,
    /// Target instance for modify/terminate orders.
    pub instance_id: Option<InstanceId>,
    /// Order number.
    pub order_number: OrderNumber,
    /// Order type.
    pub order_type: OrderType,
    /// Requested bandwidth, absent for terminations.
    pub requested_bandwidth: Option<Bandwidth>,
    /// Current status.
    pub status: OrderStatus,
    /// Total cost.
    pub total_cost: Money,
    /// Requested date.
    pub requested_date: NaiveDate,
    /// Estimated completion date.
    pub estimated_completion_date: NaiveDate,
    /// Actual completion date, once completed.
    pub actual_completion_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Opaque external workflow reference.
    pub workflow_id: Option<WorkflowId>,
    /// Stored optimistic-concurrency version.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Order Aggregate Root.
///
/// Status is mutated only through the transition methods below; orders are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    company_id: CompanyId,
    user_id: UserId,
    service_id: ServiceId,
    instance_id: Option<InstanceId>,
    order_number: OrderNumber,
    order_type: OrderType,
    requested_bandwidth: Option<Bandwidth>,
    status: OrderStatus,
    total_cost: Money,
    requested_date: NaiveDate,
    estimated_completion_date: NaiveDate,
    actual_completion_date: Option<NaiveDate>,
    notes: Option<String>,
    workflow_id: Option<WorkflowId>,
    version: u64,
    #[serde(skip)]
    events: Vec<OrderEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Submit a new order from a command.
    ///
    /// Generates an `OrderSubmitted` event.
    ///
    /// # Errors
    ///
    /// Returns error if command validation fails.
    pub fn submit(cmd: SubmitOrderCommand) -> Result<Self, DomainError> {
        cmd.validate()?;

        let id = OrderId::generate();
        let now = Timestamp::now();

        let mut order = Self {
            id: id.clone(),
            company_id: cmd.company_id,
            user_id: cmd.user_id,
            service_id: cmd.service_id,
            instance_id: cmd.kind.instance_id().cloned(),
            order_number: cmd.order_number.clone(),
            order_type: cmd.kind.order_type(),
            requested_bandwidth: cmd.kind.requested_bandwidth(),
            status: OrderStatus::Submitted,
            total_cost: cmd.total_cost,
            requested_date: cmd.requested_date,
            estimated_completion_date: cmd.estimated_completion_date,
            actual_completion_date: None,
            notes: cmd.notes,
            workflow_id: None,
            version: 0,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        order.events.push(OrderEvent::Submitted(OrderSubmitted {
            order_id: id,
            order_number: cmd.order_number,
            order_type: order.order_type,
            total_cost: order.total_cost,
            occurred_at: now,
        }));

        Ok(order)
    }

    /// Reconstitute an order from stored state (no events generated).
    #[must_use]
    pub fn reconstitute(params: ReconstitutedOrderParams) -> Self {
        Self {
            id: params.id,
            company_id: params.company_id,
            user_id: params.user_id,
            service_id: params.service_id,
            instance_id: params.instance_id,
            order_number: params.order_number,
            order_type: params.order_type,
            requested_bandwidth: params.requested_bandwidth,
            status: params.status,
            total_cost: params.total_cost,
            requested_date: params.requested_date,
            estimated_completion_date: params.estimated_completion_date,
            actual_completion_date: params.actual_completion_date,
            notes: params.notes,
            workflow_id: params.workflow_id,
            version: params.version,
            events: Vec::new(),
            created_at: params.created_at,
            updated_at: params.updated_at,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the owning company.
    #[must_use]
    pub const fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Get the requesting user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the target catalog service.
    #[must_use]
    pub const fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Get the target service instance, if any.
    #[must_use]
    pub const fn instance_id(&self) -> Option<&InstanceId> {
        self.instance_id.as_ref()
    }

    /// Get the order number.
    #[must_use]
    pub const fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Get the order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the requested bandwidth; absent for terminations.
    #[must_use]
    pub const fn requested_bandwidth(&self) -> Option<Bandwidth> {
        self.requested_bandwidth
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the total cost.
    #[must_use]
    pub const fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// Get the requested date.
    #[must_use]
    pub const fn requested_date(&self) -> NaiveDate {
        self.requested_date
    }

    /// Get the estimated completion date.
    #[must_use]
    pub const fn estimated_completion_date(&self) -> NaiveDate {
        self.estimated_completion_date
    }

    /// Get the actual completion date, once completed.
    #[must_use]
    pub const fn actual_completion_date(&self) -> Option<NaiveDate> {
        self.actual_completion_date
    }

    /// Get the free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
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

    /// Whether the order completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Whether the order can still be cancelled.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// Attach the external workflow reference (opaque passthrough).
    pub fn set_workflow_id(&mut self, workflow_id: WorkflowId) {
        self.workflow_id = Some(workflow_id);
        self.updated_at = Timestamp::now();
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Approve a submitted order.
    ///
    /// Returns whether the transition applied. Calling from any other state
    /// is a logged no-op: completion triggers arrive from external systems
    /// that may replay, so these three driver transitions stay idempotent.
    pub fn approve(&mut self) -> bool {
        if self.status != OrderStatus::Submitted {
            tracing::warn!(
                order_id = %self.id,
                status = %self.status,
                "refusing approve: order is not SUBMITTED"
            );
            return false;
        }

        self.status = OrderStatus::Approved;
        self.updated_at = Timestamp::now();
        self.events.push(OrderEvent::Approved(OrderApproved {
            order_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));
        true
    }

    /// Start provisioning work on an approved order.
    ///
    /// Returns whether the transition applied; logged no-op otherwise.
    pub fn start_processing(&mut self) -> bool {
        if self.status != OrderStatus::Approved {
            tracing::warn!(
                order_id = %self.id,
                status = %self.status,
                "refusing start_processing: order is not APPROVED"
            );
            return false;
        }

        self.status = OrderStatus::InProgress;
        self.updated_at = Timestamp::now();
        self.events
            .push(OrderEvent::ProcessingStarted(OrderProcessingStarted {
                order_id: self.id.clone(),
                occurred_at: self.updated_at,
            }));
        true
    }

    /// Complete an in-progress order, stamping the actual completion date.
    ///
    /// Returns whether the transition applied; logged no-op otherwise.
    pub fn complete(&mut self) -> bool {
        if self.status != OrderStatus::InProgress {
            tracing::warn!(
                order_id = %self.id,
                status = %self.status,
                "refusing complete: order is not IN_PROGRESS"
            );
            return false;
        }

        let now = Timestamp::now();
        self.status = OrderStatus::Completed;
        self.actual_completion_date = Some(now.date());
        self.updated_at = now;
        self.events.push(OrderEvent::Completed(OrderCompleted {
            order_id: self.id.clone(),
            order_type: self.order_type,
            completed_on: now.date(),
            occurred_at: now,
        }));
        true
    }

    /// Cancel the order.
    ///
    /// Generates an `OrderCancelled` event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the order is SUBMITTED
    /// or APPROVED.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.can_cancel() {
            return Err(DomainError::invalid_state("Order", self.status, "cancel"));
        }

        self.status = OrderStatus::Cancelled;
        self.updated_at = Timestamp::now();
        self.events.push(OrderEvent::Cancelled(OrderCancelled {
            order_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));
        Ok(())
    }

    /// Fail the order, appending the reason to its notes.
    ///
    /// Returns whether the transition applied. Failing an already-terminal
    /// order is a logged no-op.
    pub fn fail(&mut self, reason: &str) -> bool {
        if self.status.is_terminal() {
            tracing::warn!(
                order_id = %self.id,
                status = %self.status,
                "refusing fail: order is already terminal"
            );
            return false;
        }

        self.status = OrderStatus::Failed;
        self.notes = Some(match self.notes.take() {
            Some(notes) => format!("{notes}\nFailed: {reason}"),
            None => format!("Failed: {reason}"),
        });
        self.updated_at = Timestamp::now();
        self.events.push(OrderEvent::Failed(OrderFailed {
            order_id: self.id.clone(),
            reason: reason.to_string(),
            occurred_at: self.updated_at,
        }));
        true
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[OrderEvent] {
        &self.events
    }
}
