//! Shared Value Objects
//!
//! Immutable types with equality by value, used across bounded contexts.

mod bandwidth;
mod identifiers;
mod money;
mod order_number;
mod timestamp;

pub use bandwidth::Bandwidth;
pub use identifiers::{ChangeId, CompanyId, InstanceId, OrderId, ServiceId, UserId, WorkflowId};
pub use money::Money;
pub use order_number::OrderNumber;
pub use timestamp::Timestamp;
