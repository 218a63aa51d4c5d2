//! Order Repository Trait
//!
//! Defines the persistence abstraction for orders.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::Order;
use crate::domain::shared::{CompanyId, DomainError, OrderId, OrderNumber};

/// Repository trait for Order persistence.
///
/// This is a domain interface (port) implemented by infrastructure adapters.
/// `save` enforces optimistic concurrency: the stored version must match the
/// aggregate's loaded version or the save fails with `Conflict`, so two
/// concurrent transitions on the same order cannot both succeed from a stale
/// read. `next_order_sequence` must be an atomic, serializable increment —
/// a plain read-then-write counter would hand out duplicate order numbers
/// under concurrent submissions.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Save an order (insert or update), bumping its version.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Conflict`] if the stored version no longer
    /// matches the aggregate's loaded version.
    async fn save(&self, order: &mut Order) -> Result<(), DomainError>;

    /// Find an order by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Find an order by its order number.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, DomainError>;

    /// Find all orders placed by a company.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_company(&self, company_id: &CompanyId) -> Result<Vec<Order>, DomainError>;

    /// Allocate the next order-number sequence value.
    ///
    /// # Errors
    ///
    /// Returns error if the counter cannot be advanced.
    async fn next_order_sequence(&self) -> Result<u32, DomainError>;
}
