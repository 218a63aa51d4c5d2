//! Process Order Use Case
//!
//! Drives the operator/provisioning-callback side of the order lifecycle:
//! approve, start processing, complete. Completing an order applies its
//! effect on the provisioning context: a NEW_SERVICE order creates and
//! activates an instance, a MODIFY_SERVICE order records and applies a
//! bandwidth change, a TERMINATE_SERVICE order decommissions the instance.

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, ServiceCatalogPort};
use crate::config::EngineConfig;
use crate::domain::catalog::PricingCalculator;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::{Order, OrderType};
use crate::domain::provisioning::repository::{BandwidthChangeRepository, InstanceRepository};
use crate::domain::provisioning::{BandwidthChange, ServiceInstance};
use crate::domain::shared::{DomainError, InstanceId, OrderId};

/// Use case driving order transitions from external triggers.
pub struct ProcessOrderUseCase<C, O, I, B, E>
where
    C: ServiceCatalogPort,
    O: OrderRepository,
    I: InstanceRepository,
    B: BandwidthChangeRepository,
    E: EventPublisherPort,
{
    catalog: Arc<C>,
    order_repo: Arc<O>,
    instance_repo: Arc<I>,
    change_repo: Arc<B>,
    event_publisher: Arc<E>,
    config: EngineConfig,
}

impl<C, O, I, B, E> ProcessOrderUseCase<C, O, I, B, E>
where
    C: ServiceCatalogPort,
    O: OrderRepository,
    I: InstanceRepository,
    B: BandwidthChangeRepository,
    E: EventPublisherPort,
{
    /// Create a new `ProcessOrderUseCase`.
    pub const fn new(
        catalog: Arc<C>,
        order_repo: Arc<O>,
        instance_repo: Arc<I>,
        change_repo: Arc<B>,
        event_publisher: Arc<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            order_repo,
            instance_repo,
            change_repo,
            event_publisher,
            config,
        }
    }

    /// Approve a submitted order. Idempotent: an order past SUBMITTED is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order does not exist, `Conflict` if retries are
    /// exhausted.
    pub async fn approve(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        self.drive(order_id, "approve", Order::approve).await
    }

    /// Start provisioning work on an approved order. Idempotent like
    /// [`ProcessOrderUseCase::approve`].
    ///
    /// # Errors
    ///
    /// `NotFound` if the order does not exist, `Conflict` if retries are
    /// exhausted.
    pub async fn start_processing(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        self.drive(order_id, "start_processing", Order::start_processing)
            .await
    }

    /// Complete an in-progress order and apply its provisioning effect.
    ///
    /// The completion is claimed on the order first (under the versioned
    /// save), then the effect runs; an order not IN_PROGRESS is returned
    /// unchanged with no effect applied.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order or its target instance does not exist,
    /// `Conflict` if retries are exhausted, plus any pricing or lifecycle
    /// error from the effect.
    pub async fn complete(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        let mut attempts = 0;
        let order = loop {
            let mut order = self.load_order(order_id).await?;
            if !order.complete() {
                return Ok(order);
            }

            match self.order_repo.save(&mut order).await {
                Ok(()) => {
                    let events = order.drain_events();
                    if let Err(e) = self.event_publisher.publish_order_events(events).await {
                        tracing::error!("Failed to publish completion events: {}", e);
                    }
                    break order;
                }
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        order_id = %order_id,
                        attempt = attempts,
                        "complete lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        };

        match order.order_type() {
            OrderType::NewService => self.provision_new_instance(&order).await?,
            OrderType::ModifyService => self.apply_modification(&order).await?,
            OrderType::TerminateService => self.terminate_instance(&order).await?,
        }

        tracing::info!(order_number = %order.order_number(), "order completed");
        Ok(order)
    }

    /// Fail an order, recording the reason. Idempotent on terminal orders.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order does not exist, `Conflict` if retries are
    /// exhausted.
    pub async fn fail(&self, order_id: &OrderId, reason: &str) -> Result<Order, DomainError> {
        self.drive(order_id, "fail", |order| order.fail(reason)).await
    }

    // Shared read-modify-write loop for the idempotent driver transitions.
    async fn drive<F>(
        &self,
        order_id: &OrderId,
        action: &str,
        transition: F,
    ) -> Result<Order, DomainError>
    where
        F: Fn(&mut Order) -> bool,
    {
        let mut attempts = 0;
        loop {
            let mut order = self.load_order(order_id).await?;
            if !transition(&mut order) {
                // Logged by the aggregate; surfaced here as an unchanged order.
                return Ok(order);
            }

            match self.order_repo.save(&mut order).await {
                Ok(()) => {
                    let events = order.drain_events();
                    if let Err(e) = self.event_publisher.publish_order_events(events).await {
                        tracing::error!("Failed to publish order events: {}", e);
                    }
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
                        action,
                        "transition lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn load_order(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        self.order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", order_id))
    }

    async fn load_instance(&self, instance_id: &InstanceId) -> Result<ServiceInstance, DomainError> {
        self.instance_repo
            .find_by_id(instance_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceInstance", instance_id))
    }

    /// NEW_SERVICE completion: create the instance and bring it live.
    async fn provision_new_instance(&self, order: &Order) -> Result<(), DomainError> {
        let service = self.catalog.get_service(order.service_id()).await?;
        let bandwidth = order
            .requested_bandwidth()
            .ok_or_else(|| DomainError::InvalidValue {
                field: "requested_bandwidth_mbps".to_string(),
                message: "new-service order carries no bandwidth".to_string(),
            })?;
        let monthly_cost = PricingCalculator::monthly_cost(&service, Some(bandwidth))?;

        let mut instance = ServiceInstance::new(
            order.company_id().clone(),
            service.id.clone(),
            format!("{} ({})", service.name, order.order_number()),
            bandwidth,
            monthly_cost,
        );
        instance.provision(&service)?;
        self.instance_repo.save(&mut instance).await?;

        let events = instance.drain_events();
        if let Err(e) = self.event_publisher.publish_instance_events(events).await {
            tracing::error!("Failed to publish instance events: {}", e);
        }
        Ok(())
    }

    /// MODIFY_SERVICE completion: record a bandwidth change and apply it to
    /// the instance.
    async fn apply_modification(&self, order: &Order) -> Result<(), DomainError> {
        let instance_id = order
            .instance_id()
            .ok_or_else(|| DomainError::InvalidValue {
                field: "service_instance_id".to_string(),
                message: "modify-service order carries no instance".to_string(),
            })?;
        let new_bandwidth =
            order
                .requested_bandwidth()
                .ok_or_else(|| DomainError::InvalidValue {
                    field: "requested_bandwidth_mbps".to_string(),
                    message: "modify-service order carries no bandwidth".to_string(),
                })?;
        let service = self.catalog.get_service(order.service_id()).await?;

        let mut attempts = 0;
        loop {
            let mut instance = self.load_instance(instance_id).await?;
            let cost_impact = PricingCalculator::modification_delta(
                &service,
                Some(instance.current_bandwidth()),
                Some(new_bandwidth),
            )?;

            let mut change = BandwidthChange::request(
                instance.id().clone(),
                order.user_id().clone(),
                instance.current_bandwidth(),
                new_bandwidth,
                cost_impact,
                Some(format!("Order {}", order.order_number())),
            )?;
            let bandwidth = change.apply()?;
            instance.update_bandwidth(&service, bandwidth)?;

            match self.instance_repo.save(&mut instance).await {
                Ok(()) => {
                    self.change_repo.save(&mut change).await?;
                    let events = instance.drain_events();
                    if let Err(e) = self.event_publisher.publish_instance_events(events).await {
                        tracing::error!("Failed to publish instance events: {}", e);
                    }
                    return Ok(());
                }
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        instance_id = %instance_id,
                        attempt = attempts,
                        "modification lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// TERMINATE_SERVICE completion: decommission the instance.
    async fn terminate_instance(&self, order: &Order) -> Result<(), DomainError> {
        let instance_id = order
            .instance_id()
            .ok_or_else(|| DomainError::InvalidValue {
                field: "service_instance_id".to_string(),
                message: "terminate-service order carries no instance".to_string(),
            })?;

        let mut attempts = 0;
        loop {
            let mut instance = self.load_instance(instance_id).await?;
            instance.terminate()?;

            match self.instance_repo.save(&mut instance).await {
                Ok(()) => {
                    let events = instance.drain_events();
                    if let Err(e) = self.event_publisher.publish_instance_events(events).await {
                        tracing::error!("Failed to publish instance events: {}", e);
                    }
                    return Ok(());
                }
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        instance_id = %instance_id,
                        attempt = attempts,
                        "termination lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{IdentityContext, NoOpEventPublisher};
    use crate::application::use_cases::{SubmitOrderRequest, SubmitOrderUseCase};
    use crate::domain::catalog::{ServiceDefinition, ServiceType};
    use crate::domain::orders::{OrderKind, OrderStatus};
    use crate::domain::provisioning::{ChangeStatus, InstanceStatus};
    use crate::domain::shared::{Bandwidth, CompanyId, Money, ServiceId, UserId};
    use crate::infrastructure::persistence::{
        InMemoryBandwidthChangeRepository, InMemoryInstanceRepository, InMemoryOrderRepository,
        InMemoryServiceCatalog,
    };
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

    struct Harness {
        order_repo: Arc<InMemoryOrderRepository>,
        instance_repo: Arc<InMemoryInstanceRepository>,
        change_repo: Arc<InMemoryBandwidthChangeRepository>,
        submit: SubmitOrderUseCase<
            InMemoryServiceCatalog,
            InMemoryOrderRepository,
            InMemoryInstanceRepository,
            NoOpEventPublisher,
        >,
        process: ProcessOrderUseCase<
            InMemoryServiceCatalog,
            InMemoryOrderRepository,
            InMemoryInstanceRepository,
            InMemoryBandwidthChangeRepository,
            NoOpEventPublisher,
        >,
    }

    fn harness() -> Harness {
        let catalog = Arc::new(InMemoryServiceCatalog::new());
        catalog.add(fiber_500());
        let order_repo = Arc::new(InMemoryOrderRepository::new());
        let instance_repo = Arc::new(InMemoryInstanceRepository::new());
        let change_repo = Arc::new(InMemoryBandwidthChangeRepository::new());
        let publisher = Arc::new(NoOpEventPublisher);

        let submit = SubmitOrderUseCase::new(
            Arc::clone(&catalog),
            Arc::clone(&order_repo),
            Arc::clone(&instance_repo),
            Arc::clone(&publisher),
            EngineConfig::default(),
        );
        let process = ProcessOrderUseCase::new(
            Arc::clone(&catalog),
            Arc::clone(&order_repo),
            Arc::clone(&instance_repo),
            Arc::clone(&change_repo),
            Arc::clone(&publisher),
            EngineConfig::default(),
        );

        Harness {
            order_repo,
            instance_repo,
            change_repo,
            submit,
            process,
        }
    }

    fn identity() -> IdentityContext {
        IdentityContext::new(CompanyId::new("acme"), UserId::new("user-1"))
    }

    async fn submit_new_service(h: &Harness, mbps: u32) -> Order {
        h.submit
            .execute(
                &identity(),
                SubmitOrderRequest {
                    service_id: ServiceId::new("svc-fiber-500"),
                    kind: OrderKind::NewService {
                        requested_bandwidth: Bandwidth::new(mbps),
                    },
                    requested_date: None,
                    notes: None,
                },
            )
            .await
            .unwrap()
    }

    async fn completed_new_service(h: &Harness, mbps: u32) -> ServiceInstance {
        let order = submit_new_service(h, mbps).await;
        h.process.approve(order.id()).await.unwrap();
        h.process.start_processing(order.id()).await.unwrap();
        h.process.complete(order.id()).await.unwrap();

        let instances = h
            .instance_repo
            .find_by_company(&CompanyId::new("acme"))
            .await
            .unwrap();
        instances.into_iter().next().unwrap()
    }

    #[tokio::test]
    async fn approve_then_start_then_complete() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;

        let order = h.process.approve(order.id()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Approved);

        let order = h.process.start_processing(order.id()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::InProgress);

        let order = h.process.complete(order.id()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);
        assert!(order.actual_completion_date().is_some());
    }

    #[tokio::test]
    async fn approve_is_idempotent() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;

        h.process.approve(order.id()).await.unwrap();
        let again = h.process.approve(order.id()).await.unwrap();
        assert_eq!(again.status(), OrderStatus::Approved);
    }

    #[tokio::test]
    async fn complete_out_of_order_is_a_noop() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;

        let unchanged = h.process.complete(order.id()).await.unwrap();
        assert_eq!(unchanged.status(), OrderStatus::Submitted);

        // No instance was provisioned by the refused completion.
        let instances = h
            .instance_repo
            .find_by_company(&CompanyId::new("acme"))
            .await
            .unwrap();
        assert!(instances.is_empty());
    }

    #[tokio::test]
    async fn completing_new_service_provisions_an_active_instance() {
        let h = harness();
        let instance = completed_new_service(&h, 750).await;

        assert_eq!(instance.status(), InstanceStatus::Active);
        assert_eq!(instance.current_bandwidth(), Bandwidth::new(750));
        assert_eq!(instance.monthly_cost().amount(), dec!(424.00));
        assert!(instance.provisioned_at().is_some());
        assert!(instance.contract_start_date().is_some());
        assert!(instance.instance_name().contains("ORD-"));
    }

    #[tokio::test]
    async fn completing_modify_service_applies_a_bandwidth_change() {
        let h = harness();
        let instance = completed_new_service(&h, 500).await;

        let order = h
            .submit
            .execute(
                &identity(),
                SubmitOrderRequest {
                    service_id: ServiceId::new("svc-fiber-500"),
                    kind: OrderKind::ModifyService {
                        instance_id: instance.id().clone(),
                        requested_bandwidth: Bandwidth::new(750),
                    },
                    requested_date: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(order.total_cost().amount(), dec!(125.00));

        h.process.approve(order.id()).await.unwrap();
        h.process.start_processing(order.id()).await.unwrap();
        h.process.complete(order.id()).await.unwrap();

        let updated = h
            .instance_repo
            .find_by_id(instance.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.current_bandwidth(), Bandwidth::new(750));
        assert_eq!(updated.monthly_cost().amount(), dec!(424.00));
        assert!(updated.last_bandwidth_change_at().is_some());

        let changes = h.change_repo.find_by_instance(instance.id()).await.unwrap();
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.status(), ChangeStatus::Applied);
        assert_eq!(change.previous_bandwidth(), Bandwidth::new(500));
        assert_eq!(change.new_bandwidth(), Bandwidth::new(750));
        assert_eq!(change.cost_impact().amount(), dec!(125.00));
        assert!(change.is_increase());
    }

    #[tokio::test]
    async fn completing_terminate_service_decommissions_the_instance() {
        let h = harness();
        let instance = completed_new_service(&h, 500).await;

        let order = h
            .submit
            .execute(
                &identity(),
                SubmitOrderRequest {
                    service_id: ServiceId::new("svc-fiber-500"),
                    kind: OrderKind::TerminateService {
                        instance_id: instance.id().clone(),
                    },
                    requested_date: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert!(order.total_cost().is_zero());

        h.process.approve(order.id()).await.unwrap();
        h.process.start_processing(order.id()).await.unwrap();
        h.process.complete(order.id()).await.unwrap();

        let terminated = h
            .instance_repo
            .find_by_id(instance.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(terminated.status(), InstanceStatus::Terminated);
    }

    #[tokio::test]
    async fn fail_records_the_reason() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;
        h.process.approve(order.id()).await.unwrap();

        let failed = h
            .process
            .fail(order.id(), "no fiber at the address")
            .await
            .unwrap();
        assert_eq!(failed.status(), OrderStatus::Failed);
        assert!(failed.notes().unwrap().contains("no fiber at the address"));
    }

    #[tokio::test]
    async fn fail_is_noop_on_terminal_order() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;
        h.process.approve(order.id()).await.unwrap();
        h.process.start_processing(order.id()).await.unwrap();
        h.process.complete(order.id()).await.unwrap();

        let unchanged = h.process.fail(order.id(), "too late").await.unwrap();
        assert_eq!(unchanged.status(), OrderStatus::Completed);
    }

    #[tokio::test]
    async fn approve_missing_order_is_not_found() {
        let h = harness();
        let err = h
            .process
            .approve(&OrderId::new("ord-missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn completed_order_total_matches_invoice_invariant() {
        let h = harness();
        let order = submit_new_service(&h, 500).await;
        h.process.approve(order.id()).await.unwrap();
        h.process.start_processing(order.id()).await.unwrap();
        let done = h.process.complete(order.id()).await.unwrap();

        // monthlyCost(500) + setupFee = 299.00 + 150.00
        assert_eq!(done.total_cost().amount(), dec!(449.00));

        let stored = h.order_repo.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Completed);
    }
}
