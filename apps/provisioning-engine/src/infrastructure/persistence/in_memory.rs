//! In-memory repositories for testing and development.
//!
//! These adapters honor the two storage-layer guarantees the engine relies
//! on: the order-number sequence is an atomic fetch-add, and every save is a
//! compare-and-swap on the aggregate's version under the store's write lock,
//! so a writer holding a stale read fails with `Conflict` instead of
//! silently overwriting.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::application::ports::ServiceCatalogPort;
use crate::domain::catalog::ServiceDefinition;
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::provisioning::change::BandwidthChange;
use crate::domain::provisioning::instance::ServiceInstance;
use crate::domain::provisioning::repository::{BandwidthChangeRepository, InstanceRepository};
use crate::domain::shared::{
    ChangeId, CompanyId, DomainError, InstanceId, OrderId, OrderNumber, ServiceId,
};

/// In-memory implementation of `OrderRepository`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
    sequence: AtomicU32,
}

impl InMemoryOrderRepository {
    /// Create a new empty repository with a fresh sequence counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            sequence: AtomicU32::new(0),
        }
    }

    /// Get the number of orders in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().unwrap().is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &mut Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().unwrap();
        let stored_version = orders.get(order.id().as_str()).map(Order::version);
        if let Some(stored) = stored_version {
            if stored != order.version() {
                return Err(DomainError::conflict("Order", order.id()));
            }
        }
        order.set_version(order.version() + 1);
        orders.insert(order.id().as_str().to_string(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(id.as_str()).cloned())
    }

    async fn find_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .find(|o| o.order_number() == order_number)
            .cloned())
    }

    async fn find_by_company(&self, company_id: &CompanyId) -> Result<Vec<Order>, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| o.company_id() == company_id)
            .cloned()
            .collect())
    }

    async fn next_order_sequence(&self) -> Result<u32, DomainError> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// In-memory implementation of `InstanceRepository`.
#[derive(Debug, Default)]
pub struct InMemoryInstanceRepository {
    instances: RwLock<HashMap<String, ServiceInstance>>,
}

impl InMemoryInstanceRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of instances in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.read().unwrap().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.read().unwrap().is_empty()
    }
}

#[async_trait]
impl InstanceRepository for InMemoryInstanceRepository {
    async fn save(&self, instance: &mut ServiceInstance) -> Result<(), DomainError> {
        let mut instances = self.instances.write().unwrap();
        let stored_version = instances
            .get(instance.id().as_str())
            .map(ServiceInstance::version);
        if let Some(stored) = stored_version {
            if stored != instance.version() {
                return Err(DomainError::conflict("ServiceInstance", instance.id()));
            }
        }
        instance.set_version(instance.version() + 1);
        instances.insert(instance.id().as_str().to_string(), instance.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &InstanceId) -> Result<Option<ServiceInstance>, DomainError> {
        let instances = self.instances.read().unwrap();
        Ok(instances.get(id.as_str()).cloned())
    }

    async fn find_by_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<ServiceInstance>, DomainError> {
        let instances = self.instances.read().unwrap();
        Ok(instances
            .values()
            .filter(|i| i.company_id() == company_id)
            .cloned()
            .collect())
    }
}

/// In-memory implementation of `BandwidthChangeRepository`.
#[derive(Debug, Default)]
pub struct InMemoryBandwidthChangeRepository {
    changes: RwLock<HashMap<String, BandwidthChange>>,
}

impl InMemoryBandwidthChangeRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            changes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BandwidthChangeRepository for InMemoryBandwidthChangeRepository {
    async fn save(&self, change: &mut BandwidthChange) -> Result<(), DomainError> {
        let mut changes = self.changes.write().unwrap();
        let stored_version = changes
            .get(change.id().as_str())
            .map(BandwidthChange::version);
        if let Some(stored) = stored_version {
            if stored != change.version() {
                return Err(DomainError::conflict("BandwidthChange", change.id()));
            }
        }
        change.set_version(change.version() + 1);
        changes.insert(change.id().as_str().to_string(), change.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChangeId) -> Result<Option<BandwidthChange>, DomainError> {
        let changes = self.changes.read().unwrap();
        Ok(changes.get(id.as_str()).cloned())
    }

    async fn find_by_instance(
        &self,
        instance_id: &InstanceId,
    ) -> Result<Vec<BandwidthChange>, DomainError> {
        let changes = self.changes.read().unwrap();
        let mut result: Vec<BandwidthChange> = changes
            .values()
            .filter(|c| c.instance_id() == instance_id)
            .cloned()
            .collect();
        result.sort_by_key(BandwidthChange::created_at);
        Ok(result)
    }
}

/// In-memory catalog adapter, seeded by tests or a deployment harness.
#[derive(Debug, Default)]
pub struct InMemoryServiceCatalog {
    services: RwLock<HashMap<String, ServiceDefinition>>,
}

impl InMemoryServiceCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace a service definition.
    pub fn add(&self, service: ServiceDefinition) {
        let mut services = self.services.write().unwrap();
        services.insert(service.id.as_str().to_string(), service);
    }
}

#[async_trait]
impl ServiceCatalogPort for InMemoryServiceCatalog {
    async fn get_service(&self, id: &ServiceId) -> Result<ServiceDefinition, DomainError> {
        let services = self.services.read().unwrap();
        services
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| DomainError::not_found("Service", id))
    }
}
