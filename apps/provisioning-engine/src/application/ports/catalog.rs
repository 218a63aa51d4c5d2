//! Catalog lookup port.

use async_trait::async_trait;

use crate::domain::catalog::ServiceDefinition;
use crate::domain::shared::{DomainError, ServiceId};

/// Read access to the service catalog.
///
/// The catalog itself is maintained outside this core; the engine only ever
/// reads definitions from it.
#[async_trait]
pub trait ServiceCatalogPort: Send + Sync {
    /// Look up a service definition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] if no such service exists.
    async fn get_service(&self, id: &ServiceId) -> Result<ServiceDefinition, DomainError>;
}
