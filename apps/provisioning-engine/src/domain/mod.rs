//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure
//! dependencies. This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of state transitions
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`catalog`]: Read-only service definitions, bandwidth rules, tiered pricing
//! - [`orders`]: Order lifecycle from submission to completion
//! - [`provisioning`]: Live service instances and audited bandwidth changes

pub mod catalog;
pub mod orders;
pub mod provisioning;
pub mod shared;
