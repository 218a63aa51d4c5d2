//! Provisioning Repository Traits
//!
//! Persistence abstractions for service instances and bandwidth changes.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::change::BandwidthChange;
use super::instance::ServiceInstance;
use crate::domain::shared::{ChangeId, CompanyId, DomainError, InstanceId};

/// Repository trait for ServiceInstance persistence.
///
/// `save` enforces optimistic concurrency the same way the order repository
/// does: a stale version fails with `Conflict` so two concurrent mutations
/// of the same instance cannot both succeed from a stale read.
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// Save an instance (insert or update), bumping its version.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] if the stored version no longer
    /// matches the aggregate's loaded version.
    async fn save(&self, instance: &mut ServiceInstance) -> Result<(), DomainError>;

    /// Find an instance by its ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: &InstanceId) -> Result<Option<ServiceInstance>, DomainError>;

    /// Find all instances owned by a company.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<ServiceInstance>, DomainError>;
}

/// Repository trait for BandwidthChange persistence.
#[async_trait]
pub trait BandwidthChangeRepository: Send + Sync {
    /// Save a change record (insert or update), bumping its version.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] if the stored version no longer
    /// matches the aggregate's loaded version.
    async fn save(&self, change: &mut BandwidthChange) -> Result<(), DomainError>;

    /// Find a change record by its ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: &ChangeId) -> Result<Option<BandwidthChange>, DomainError>;

    /// Find the change history of an instance.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_instance(
        &self,
        instance_id: &InstanceId,
    ) -> Result<Vec<BandwidthChange>, DomainError>;
}
