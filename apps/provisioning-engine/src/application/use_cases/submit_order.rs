//! Submit Order Use Case

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};

use crate::application::ports::{EventPublisherPort, IdentityContext, ServiceCatalogPort};
use crate::config::EngineConfig;
use crate::domain::catalog::{CatalogRules, PricingCalculator, ServiceDefinition};
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::{Order, OrderKind, SubmitOrderCommand};
use crate::domain::provisioning::repository::InstanceRepository;
use crate::domain::shared::{DomainError, Money, OrderNumber, ServiceId};

/// A caller's request to place an order.
///
/// Primitive-validated input from the excluded presentation layer; the
/// type-specific required fields live in [`OrderKind`].
#[derive(Debug, Clone)]
pub struct SubmitOrderRequest {
    /// Catalog service being ordered.
    pub service_id: ServiceId,
    /// Order type with its per-type fields.
    pub kind: OrderKind,
    /// Date the customer asks for; defaults to tomorrow.
    pub requested_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Use case for placing orders.
pub struct SubmitOrderUseCase<C, O, I, E>
where
    C: ServiceCatalogPort,
    O: OrderRepository,
    I: InstanceRepository,
    E: EventPublisherPort,
{
    catalog: Arc<C>,
    order_repo: Arc<O>,
    instance_repo: Arc<I>,
    event_publisher: Arc<E>,
    config: EngineConfig,
}

impl<C, O, I, E> SubmitOrderUseCase<C, O, I, E>
where
    C: ServiceCatalogPort,
    O: OrderRepository,
    I: InstanceRepository,
    E: EventPublisherPort,
{
    /// Create a new `SubmitOrderUseCase`.
    pub const fn new(
        catalog: Arc<C>,
        order_repo: Arc<O>,
        instance_repo: Arc<I>,
        event_publisher: Arc<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            order_repo,
            instance_repo,
            event_publisher,
            config,
        }
    }

    /// Place an order for the calling company.
    ///
    /// Validates the service and bandwidth against the catalog, checks
    /// instance ownership for modify/terminate orders, allocates the next
    /// order number, computes the total cost and persists the order in
    /// SUBMITTED state.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing service or instance, `Unavailable` for an
    /// unorderable service, `InvalidBandwidth` for a value outside the
    /// catalog bounds, `Forbidden` for an instance owned by another company.
    pub async fn execute(
        &self,
        identity: &IdentityContext,
        request: SubmitOrderRequest,
    ) -> Result<Order, DomainError> {
        tracing::info!(
            service_id = %request.service_id,
            order_type = %request.kind.order_type(),
            "submitting order"
        );

        let service = self.catalog.get_service(&request.service_id).await?;
        service.validate()?;
        if !CatalogRules::is_orderable(&service) {
            return Err(DomainError::Unavailable {
                service_id: service.id.to_string(),
            });
        }

        if let Some(bandwidth) = request.kind.requested_bandwidth() {
            CatalogRules::validate_bandwidth(&service, Some(bandwidth))?;
        }

        let total_cost = self
            .compute_total_cost(identity, &service, &request.kind)
            .await?;

        let sequence = self.order_repo.next_order_sequence().await?;
        let order_number = OrderNumber::from_sequence(sequence);

        let requested_date = request.requested_date.unwrap_or_else(tomorrow);
        let estimated_completion_date =
            self.estimate_completion(&service, requested_date);

        let mut order = Order::submit(SubmitOrderCommand {
            company_id: identity.company_id.clone(),
            user_id: identity.user_id.clone(),
            service_id: service.id.clone(),
            kind: request.kind,
            order_number,
            total_cost,
            requested_date,
            estimated_completion_date,
            notes: request.notes,
        })?;

        self.order_repo.save(&mut order).await?;

        let events = order.drain_events();
        if let Err(e) = self.event_publisher.publish_order_events(events).await {
            tracing::error!("Failed to publish order events: {}", e);
        }

        tracing::info!(order_number = %order.order_number(), "order submitted");
        Ok(order)
    }

    /// Total cost per order type: first month plus setup for a new service,
    /// monthly delta for a modification, zero for a termination.
    async fn compute_total_cost(
        &self,
        identity: &IdentityContext,
        service: &ServiceDefinition,
        kind: &OrderKind,
    ) -> Result<Money, DomainError> {
        match kind {
            OrderKind::NewService {
                requested_bandwidth,
            } => PricingCalculator::new_service_total(service, Some(*requested_bandwidth)),
            OrderKind::ModifyService {
                instance_id,
                requested_bandwidth,
            } => {
                let instance = self
                    .instance_repo
                    .find_by_id(instance_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("ServiceInstance", instance_id))?;
                if instance.company_id() != &identity.company_id {
                    return Err(DomainError::forbidden("ServiceInstance", instance_id));
                }
                PricingCalculator::modification_delta(
                    service,
                    Some(instance.current_bandwidth()),
                    Some(*requested_bandwidth),
                )
            }
            OrderKind::TerminateService { instance_id } => {
                let instance = self
                    .instance_repo
                    .find_by_id(instance_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("ServiceInstance", instance_id))?;
                if instance.company_id() != &identity.company_id {
                    return Err(DomainError::forbidden("ServiceInstance", instance_id));
                }
                Ok(Money::ZERO)
            }
        }
    }

    fn estimate_completion(&self, service: &ServiceDefinition, requested: NaiveDate) -> NaiveDate {
        let hours = service
            .provisioning_time_hours
            .unwrap_or(self.config.default_provisioning_hours);
        let days = u64::from(hours.div_ceil(24));
        requested
            .checked_add_days(Days::new(days))
            .unwrap_or(requested)
    }
}

fn tomorrow() -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpEventPublisher;
    use crate::domain::catalog::ServiceType;
    use crate::domain::orders::{OrderStatus, OrderType};
    use crate::domain::provisioning::ServiceInstance;
    use crate::domain::shared::{Bandwidth, CompanyId, UserId};
    use crate::infrastructure::persistence::{
        InMemoryInstanceRepository, InMemoryOrderRepository, InMemoryServiceCatalog,
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
        catalog: Arc<InMemoryServiceCatalog>,
        order_repo: Arc<InMemoryOrderRepository>,
        instance_repo: Arc<InMemoryInstanceRepository>,
        use_case: SubmitOrderUseCase<
            InMemoryServiceCatalog,
            InMemoryOrderRepository,
            InMemoryInstanceRepository,
            NoOpEventPublisher,
        >,
    }

    fn harness() -> Harness {
        let catalog = Arc::new(InMemoryServiceCatalog::new());
        catalog.add(fiber_500());
        let order_repo = Arc::new(InMemoryOrderRepository::new());
        let instance_repo = Arc::new(InMemoryInstanceRepository::new());
        let use_case = SubmitOrderUseCase::new(
            Arc::clone(&catalog),
            Arc::clone(&order_repo),
            Arc::clone(&instance_repo),
            Arc::new(NoOpEventPublisher),
            EngineConfig::default(),
        );
        Harness {
            catalog,
            order_repo,
            instance_repo,
            use_case,
        }
    }

    fn identity() -> IdentityContext {
        IdentityContext::new(CompanyId::new("acme"), UserId::new("user-1"))
    }

    async fn seed_active_instance(h: &Harness, company: &str, bandwidth: u32) -> ServiceInstance {
        let mut instance = ServiceInstance::new(
            CompanyId::new(company),
            ServiceId::new("svc-fiber-500"),
            "Seeded instance",
            Bandwidth::new(bandwidth),
            Money::new(dec!(299.00)),
        );
        instance.provision(&fiber_500()).unwrap();
        instance.drain_events();
        h.instance_repo.save(&mut instance).await.unwrap();
        instance
    }

    fn new_service_request(mbps: u32) -> SubmitOrderRequest {
        SubmitOrderRequest {
            service_id: ServiceId::new("svc-fiber-500"),
            kind: OrderKind::NewService {
                requested_bandwidth: Bandwidth::new(mbps),
            },
            requested_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            notes: None,
        }
    }

    #[tokio::test]
    async fn new_service_order_total_is_monthly_plus_setup() {
        let h = harness();
        let order = h
            .use_case
            .execute(&identity(), new_service_request(500))
            .await
            .unwrap();

        assert_eq!(order.status(), OrderStatus::Submitted);
        assert_eq!(order.order_type(), OrderType::NewService);
        assert_eq!(order.total_cost().amount(), dec!(449.00));
    }

    #[tokio::test]
    async fn estimated_completion_rounds_provisioning_hours_up() {
        let h = harness();
        // 48 hours -> 2 days
        let order = h
            .use_case
            .execute(&identity(), new_service_request(500))
            .await
            .unwrap();
        assert_eq!(
            order.estimated_completion_date(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
        );

        // 36 hours -> ceil to 2 days
        let mut service = fiber_500();
        service.id = ServiceId::new("svc-fiber-36h");
        service.provisioning_time_hours = Some(36);
        h.catalog.add(service);

        let mut request = new_service_request(500);
        request.service_id = ServiceId::new("svc-fiber-36h");
        let order = h.use_case.execute(&identity(), request).await.unwrap();
        assert_eq!(
            order.estimated_completion_date(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
        );
    }

    #[tokio::test]
    async fn requested_date_defaults_to_tomorrow() {
        let h = harness();
        let mut request = new_service_request(500);
        request.requested_date = None;

        let order = h.use_case.execute(&identity(), request).await.unwrap();
        assert_eq!(order.requested_date(), tomorrow());
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let h = harness();
        let mut request = new_service_request(500);
        request.service_id = ServiceId::new("svc-missing");

        let err = h.use_case.execute(&identity(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unorderable_service_is_unavailable() {
        let h = harness();
        let mut service = fiber_500();
        service.id = ServiceId::new("svc-retired");
        service.available = false;
        h.catalog.add(service);

        let mut request = new_service_request(500);
        request.service_id = ServiceId::new("svc-retired");

        let err = h.use_case.execute(&identity(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn out_of_bounds_bandwidth_is_rejected() {
        let h = harness();
        let err = h
            .use_case
            .execute(&identity(), new_service_request(5000))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidBandwidth { .. }));
    }

    #[tokio::test]
    async fn modify_order_total_is_the_monthly_delta() {
        let h = harness();
        let instance = seed_active_instance(&h, "acme", 500).await;

        let request = SubmitOrderRequest {
            service_id: ServiceId::new("svc-fiber-500"),
            kind: OrderKind::ModifyService {
                instance_id: instance.id().clone(),
                requested_bandwidth: Bandwidth::new(750),
            },
            requested_date: None,
            notes: None,
        };

        let order = h.use_case.execute(&identity(), request).await.unwrap();
        assert_eq!(order.order_type(), OrderType::ModifyService);
        assert_eq!(order.total_cost().amount(), dec!(125.00));
    }

    #[tokio::test]
    async fn modify_order_for_foreign_instance_is_forbidden() {
        let h = harness();
        let instance = seed_active_instance(&h, "globex", 500).await;

        let request = SubmitOrderRequest {
            service_id: ServiceId::new("svc-fiber-500"),
            kind: OrderKind::ModifyService {
                instance_id: instance.id().clone(),
                requested_bandwidth: Bandwidth::new(750),
            },
            requested_date: None,
            notes: None,
        };

        let err = h.use_case.execute(&identity(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn modify_order_for_missing_instance_is_not_found() {
        let h = harness();
        let request = SubmitOrderRequest {
            service_id: ServiceId::new("svc-fiber-500"),
            kind: OrderKind::ModifyService {
                instance_id: crate::domain::shared::InstanceId::new("inst-missing"),
                requested_bandwidth: Bandwidth::new(750),
            },
            requested_date: None,
            notes: None,
        };

        let err = h.use_case.execute(&identity(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn terminate_order_costs_nothing() {
        let h = harness();
        let instance = seed_active_instance(&h, "acme", 750).await;

        let request = SubmitOrderRequest {
            service_id: ServiceId::new("svc-fiber-500"),
            kind: OrderKind::TerminateService {
                instance_id: instance.id().clone(),
            },
            requested_date: None,
            notes: None,
        };

        let order = h.use_case.execute(&identity(), request).await.unwrap();
        assert_eq!(order.order_type(), OrderType::TerminateService);
        assert!(order.total_cost().is_zero());
        assert!(order.requested_bandwidth().is_none());
    }

    #[tokio::test]
    async fn order_numbers_are_sequential() {
        let h = harness();
        let first = h
            .use_case
            .execute(&identity(), new_service_request(500))
            .await
            .unwrap();
        let second = h
            .use_case
            .execute(&identity(), new_service_request(500))
            .await
            .unwrap();

        assert_eq!(first.order_number().as_str(), "ORD-000001");
        assert_eq!(second.order_number().as_str(), "ORD-000002");
    }

    #[tokio::test]
    async fn submitted_order_is_persisted() {
        let h = harness();
        let order = h
            .use_case
            .execute(&identity(), new_service_request(500))
            .await
            .unwrap();

        let found = h
            .order_repo
            .find_by_order_number(order.order_number())
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id(), order.id());
    }
}
