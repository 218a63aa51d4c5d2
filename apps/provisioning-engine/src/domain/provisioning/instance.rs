//! Service Instance Aggregate Root
//!
//! A company's live, billable subscription to a catalog service.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::{CatalogRules, PricingCalculator, ServiceDefinition};
use crate::domain::provisioning::events::{
    BandwidthUpdated, InstanceEvent, InstanceProvisioned, InstanceReactivated, InstanceSuspended,
    InstanceTerminated,
};
use crate::domain::shared::{
    Bandwidth, CompanyId, DomainError, InstanceId, Money, ServiceId, Timestamp,
};

/// Service instance status.
///
/// Lifecycle: `PENDING -> PROVISIONING -> ACTIVE -> SUSPENDED | TERMINATED`.
/// Only termination is terminal; a suspended instance can return to service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Created, awaiting provisioning.
    Pending,
    /// Provisioning in progress.
    Provisioning,
    /// Live and billable.
    Active,
    /// Temporarily out of service.
    Suspended,
    /// Permanently decommissioned.
    Terminated,
}

impl InstanceStatus {
    /// Returns true if the instance is live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true if the instance is permanently decommissioned.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Provisioning => write!(f, "PROVISIONING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Parameters for reconstituting a ServiceInstance from storage.
#[derive(Debug, Clone)]
pub struct ReconstitutedInstanceParams {
    /// Instance identifier.
    pub id: InstanceId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Backing catalog service.
    pub service_id: ServiceId,
    /// Display name.
    pub instance_name: String,
    /// Current billed bandwidth.
    pub current_bandwidth: Bandwidth,
    /// Current status.
    pub status: InstanceStatus,
    /// Current monthly cost.
    pub monthly_cost: Money,
    /// Contract start date.
    pub contract_start_date: Option<NaiveDate>,
    /// Contract end date.
    pub contract_end_date: Option<NaiveDate>,
    /// Last bandwidth change timestamp.
    pub last_bandwidth_change_at: Option<Timestamp>,
    /// Provisioning timestamp.
    pub provisioned_at: Option<Timestamp>,
    /// Stored optimistic-concurrency version.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Service Instance Aggregate Root.
///
/// Created when a NEW_SERVICE order completes; its billed bandwidth changes
/// only through [`ServiceInstance::update_bandwidth`]; terminated when a
/// TERMINATE_SERVICE order completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstance {
    id: InstanceId,
    company_id: CompanyId,
    service_id: ServiceId,
    instance_name: String,
    current_bandwidth: Bandwidth,
    status: InstanceStatus,
    monthly_cost: Money,
    contract_start_date: Option<NaiveDate>,
    contract_end_date: Option<NaiveDate>,
    last_bandwidth_change_at: Option<Timestamp>,
    provisioned_at: Option<Timestamp>,
    version: u64,
    #[serde(skip)]
    events: Vec<InstanceEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ServiceInstance {
    /// Create a new instance in `PENDING`, awaiting provisioning.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        service_id: ServiceId,
        instance_name: impl Into<String>,
        bandwidth: Bandwidth,
        monthly_cost: Money,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: InstanceId::generate(),
            company_id,
            service_id,
            instance_name: instance_name.into(),
            current_bandwidth: bandwidth,
            status: InstanceStatus::Pending,
            monthly_cost,
            contract_start_date: None,
            contract_end_date: None,
            last_bandwidth_change_at: None,
            provisioned_at: None,
            version: 0,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute an instance from stored state (no events generated).
    #[must_use]
    pub fn reconstitute(params: ReconstitutedInstanceParams) -> Self {
        Self {
            id: params.id,
            company_id: params.company_id,
            service_id: params.service_id,
            instance_name: params.instance_name,
            current_bandwidth: params.current_bandwidth,
            status: params.status,
            monthly_cost: params.monthly_cost,
            contract_start_date: params.contract_start_date,
            contract_end_date: params.contract_end_date,
            last_bandwidth_change_at: params.last_bandwidth_change_at,
            provisioned_at: params.provisioned_at,
            version: params.version,
            events: Vec::new(),
            created_at: params.created_at,
            updated_at: params.updated_at,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the instance ID.
    #[must_use]
    pub const fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Get the owning company.
    #[must_use]
    pub const fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Get the backing catalog service.
    #[must_use]
    pub const fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Get the display name.
    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Get the current billed bandwidth.
    #[must_use]
    pub const fn current_bandwidth(&self) -> Bandwidth {
        self.current_bandwidth
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> InstanceStatus {
        self.status
    }

    /// Get the current monthly cost.
    #[must_use]
    pub const fn monthly_cost(&self) -> Money {
        self.monthly_cost
    }

    /// Get the contract start date.
    #[must_use]
    pub const fn contract_start_date(&self) -> Option<NaiveDate> {
        self.contract_start_date
    }

    /// Get the contract end date.
    #[must_use]
    pub const fn contract_end_date(&self) -> Option<NaiveDate> {
        self.contract_end_date
    }

    /// Get the last bandwidth change timestamp.
    #[must_use]
    pub const fn last_bandwidth_change_at(&self) -> Option<Timestamp> {
        self.last_bandwidth_change_at
    }

    /// Get the provisioning timestamp.
    #[must_use]
    pub const fn provisioned_at(&self) -> Option<Timestamp> {
        self.provisioned_at
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

    /// Whether the instance is live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether this instance may take a bandwidth change right now.
    #[must_use]
    pub fn can_adjust_bandwidth(&self, service: &ServiceDefinition) -> bool {
        self.is_active() && service.is_bandwidth_adjustable()
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Move a pending instance into provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the instance is PENDING.
    pub fn start_provisioning(&mut self) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Pending {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                self.status,
                "start provisioning",
            ));
        }
        self.status = InstanceStatus::Provisioning;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Activate the instance, stamping `provisioned_at` and deriving contract
    /// dates from the service's term when they are not already set.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] if the instance is already
    /// active, suspended or terminated.
    pub fn provision(&mut self, service: &ServiceDefinition) -> Result<(), DomainError> {
        if !matches!(
            self.status,
            InstanceStatus::Pending | InstanceStatus::Provisioning
        ) {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                self.status,
                "provision",
            ));
        }

        let now = Timestamp::now();
        self.status = InstanceStatus::Active;
        self.provisioned_at = Some(now);

        let start = *self.contract_start_date.get_or_insert_with(|| now.date());
        if self.contract_end_date.is_none() {
            if let Some(term) = service.contract_term_months {
                self.contract_end_date = start.checked_add_months(Months::new(term));
            }
        }

        self.updated_at = now;
        self.events.push(InstanceEvent::Provisioned(InstanceProvisioned {
            instance_id: self.id.clone(),
            bandwidth: self.current_bandwidth,
            occurred_at: now,
        }));
        Ok(())
    }

    /// Change the billed bandwidth.
    ///
    /// This is the single authorized path by which an instance's billed
    /// bandwidth may change: it validates the value against the catalog
    /// bounds, stamps `last_bandwidth_change_at` and recomputes the monthly
    /// cost, keeping the bounds invariant intact.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBandwidth`] when the value fails the
    /// catalog bounds, or a pricing error when the service carries no base
    /// price.
    pub fn update_bandwidth(
        &mut self,
        service: &ServiceDefinition,
        new_bandwidth: Bandwidth,
    ) -> Result<(), DomainError> {
        if !CatalogRules::is_valid_bandwidth(service, Some(new_bandwidth)) {
            return Err(DomainError::InvalidBandwidth {
                requested_mbps: Some(new_bandwidth.mbps()),
                min_mbps: service.min_bandwidth.map(|b| b.mbps()),
                max_mbps: service.max_bandwidth.map(|b| b.mbps()),
            });
        }

        let previous = self.current_bandwidth;
        let now = Timestamp::now();

        self.current_bandwidth = new_bandwidth;
        self.last_bandwidth_change_at = Some(now);
        self.monthly_cost = PricingCalculator::monthly_cost(service, Some(new_bandwidth))?;
        self.updated_at = now;

        self.events.push(InstanceEvent::BandwidthUpdated(BandwidthUpdated {
            instance_id: self.id.clone(),
            previous_bandwidth: previous,
            new_bandwidth,
            monthly_cost: self.monthly_cost,
            occurred_at: now,
        }));
        Ok(())
    }

    /// Suspend a live instance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the instance is ACTIVE.
    pub fn suspend(&mut self) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Active {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                self.status,
                "suspend",
            ));
        }
        self.status = InstanceStatus::Suspended;
        self.updated_at = Timestamp::now();
        self.events.push(InstanceEvent::Suspended(InstanceSuspended {
            instance_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));
        Ok(())
    }

    /// Return a suspended instance to service.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] unless the instance is SUSPENDED.
    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Suspended {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                self.status,
                "reactivate",
            ));
        }
        self.status = InstanceStatus::Active;
        self.updated_at = Timestamp::now();
        self.events.push(InstanceEvent::Reactivated(InstanceReactivated {
            instance_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));
        Ok(())
    }

    /// Permanently decommission the instance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidState`] if already terminated.
    pub fn terminate(&mut self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                self.status,
                "terminate",
            ));
        }
        self.status = InstanceStatus::Terminated;
        self.updated_at = Timestamp::now();
        self.events.push(InstanceEvent::Terminated(InstanceTerminated {
            instance_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<InstanceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[InstanceEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ServiceType;
    use rust_decimal_macros::dec;

    fn fiber_500() -> ServiceDefinition {
        ServiceDefinition {
            id: ServiceId::new("svc-fiber-500"),
            name: "Business Fiber 500".to_string(),
            description: None,
            service_type: ServiceType::Fiber,
            base_bandwidth: Some(Bandwidth::new(500)),
            min_bandwidth: Some(Bandwidth::new(100)),
            max_bandwidth: Some(Bandwidth::new(1000)),
            base_price_monthly: Some(Money::new(dec!(299.00))),
            price_per_mbps: Some(Money::new(dec!(0.50))),
            setup_fee: Some(Money::new(dec!(150.00))),
            contract_term_months: Some(12),
            bandwidth_adjustable: true,
            available: true,
            provisioning_time_hours: Some(48),
        }
    }

    fn pending_instance() -> ServiceInstance {
        ServiceInstance::new(
            CompanyId::new("acme"),
            ServiceId::new("svc-fiber-500"),
            "Business Fiber 500 (ORD-000001)",
            Bandwidth::new(500),
            Money::new(dec!(299.00)),
        )
    }

    fn active_instance() -> ServiceInstance {
        let mut instance = pending_instance();
        instance.provision(&fiber_500()).unwrap();
        instance.drain_events();
        instance
    }

    #[test]
    fn new_instance_starts_pending() {
        let instance = pending_instance();
        assert_eq!(instance.status(), InstanceStatus::Pending);
        assert!(instance.provisioned_at().is_none());
        assert!(instance.contract_start_date().is_none());
    }

    #[test]
    fn provision_activates_and_derives_contract_dates() {
        let mut instance = pending_instance();
        instance.provision(&fiber_500()).unwrap();

        assert_eq!(instance.status(), InstanceStatus::Active);
        assert!(instance.provisioned_at().is_some());

        let start = instance.contract_start_date().unwrap();
        let end = instance.contract_end_date().unwrap();
        assert_eq!(start.checked_add_months(Months::new(12)).unwrap(), end);

        assert!(matches!(
            instance.pending_events()[0],
            InstanceEvent::Provisioned(_)
        ));
    }

    #[test]
    fn provision_preserves_preset_contract_dates() {
        let mut instance = pending_instance();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        instance.contract_start_date = Some(start);
        instance.contract_end_date = Some(end);

        instance.provision(&fiber_500()).unwrap();
        assert_eq!(instance.contract_start_date(), Some(start));
        assert_eq!(instance.contract_end_date(), Some(end));
    }

    #[test]
    fn provision_from_provisioning_state() {
        let mut instance = pending_instance();
        instance.start_provisioning().unwrap();
        assert_eq!(instance.status(), InstanceStatus::Provisioning);

        instance.provision(&fiber_500()).unwrap();
        assert_eq!(instance.status(), InstanceStatus::Active);
    }

    #[test]
    fn provision_twice_is_invalid() {
        let mut instance = active_instance();
        let err = instance.provision(&fiber_500()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[test]
    fn start_provisioning_requires_pending() {
        let mut instance = active_instance();
        assert!(instance.start_provisioning().is_err());
    }

    #[test]
    fn can_adjust_bandwidth_requires_active_and_adjustable() {
        let service = fiber_500();

        let pending = pending_instance();
        assert!(!pending.can_adjust_bandwidth(&service));

        let active = active_instance();
        assert!(active.can_adjust_bandwidth(&service));

        let mut fixed = fiber_500();
        fixed.bandwidth_adjustable = false;
        assert!(!active.can_adjust_bandwidth(&fixed));
    }

    #[test]
    fn update_bandwidth_mutates_cost_and_stamps() {
        let mut instance = active_instance();
        instance
            .update_bandwidth(&fiber_500(), Bandwidth::new(750))
            .unwrap();

        assert_eq!(instance.current_bandwidth(), Bandwidth::new(750));
        assert_eq!(instance.monthly_cost().amount(), dec!(424.00));
        assert!(instance.last_bandwidth_change_at().is_some());

        match &instance.pending_events()[0] {
            InstanceEvent::BandwidthUpdated(e) => {
                assert_eq!(e.previous_bandwidth, Bandwidth::new(500));
                assert_eq!(e.new_bandwidth, Bandwidth::new(750));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn update_bandwidth_rejects_out_of_bounds() {
        let mut instance = active_instance();
        let err = instance
            .update_bandwidth(&fiber_500(), Bandwidth::new(5000))
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidBandwidth { .. }));
        assert_eq!(instance.current_bandwidth(), Bandwidth::new(500));
        assert!(instance.last_bandwidth_change_at().is_none());
    }

    #[test]
    fn suspend_and_reactivate() {
        let mut instance = active_instance();
        instance.suspend().unwrap();
        assert_eq!(instance.status(), InstanceStatus::Suspended);

        instance.reactivate().unwrap();
        assert_eq!(instance.status(), InstanceStatus::Active);
    }

    #[test]
    fn suspend_requires_active() {
        let mut instance = pending_instance();
        assert!(instance.suspend().is_err());
    }

    #[test]
    fn reactivate_requires_suspended() {
        let mut instance = active_instance();
        assert!(instance.reactivate().is_err());
    }

    #[test]
    fn terminate_from_active() {
        let mut instance = active_instance();
        instance.terminate().unwrap();
        assert_eq!(instance.status(), InstanceStatus::Terminated);
        assert!(matches!(
            instance.pending_events()[0],
            InstanceEvent::Terminated(_)
        ));
    }

    #[test]
    fn terminate_twice_is_invalid() {
        let mut instance = active_instance();
        instance.terminate().unwrap();
        assert!(instance.terminate().is_err());
    }

    #[test]
    fn serde_roundtrip_skips_events() {
        let mut instance = active_instance();
        instance
            .update_bandwidth(&fiber_500(), Bandwidth::new(750))
            .unwrap();

        let json = serde_json::to_string(&instance).unwrap();
        let parsed: ServiceInstance = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id(), instance.id());
        assert_eq!(parsed.current_bandwidth(), Bandwidth::new(750));
        assert!(parsed.pending_events().is_empty());
    }

    #[test]
    fn reconstitute_produces_no_events() {
        let now = Timestamp::now();
        let instance = ServiceInstance::reconstitute(ReconstitutedInstanceParams {
            id: InstanceId::new("inst-recon"),
            company_id: CompanyId::new("acme"),
            service_id: ServiceId::new("svc-1"),
            instance_name: "Recon".to_string(),
            current_bandwidth: Bandwidth::new(500),
            status: InstanceStatus::Active,
            monthly_cost: Money::new(dec!(299.00)),
            contract_start_date: None,
            contract_end_date: None,
            last_bandwidth_change_at: None,
            provisioned_at: Some(now),
            version: 2,
            created_at: now,
            updated_at: now,
        });

        assert_eq!(instance.id().as_str(), "inst-recon");
        assert_eq!(instance.version(), 2);
        assert!(instance.pending_events().is_empty());
    }
}
