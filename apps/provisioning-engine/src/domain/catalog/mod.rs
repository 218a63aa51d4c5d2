//! Catalog Bounded Context
//!
//! Read-only service definitions plus the stateless rules and pricing
//! applied to them. Nothing in this context mutates state; the workflow
//! contexts consult it before persisting anything.

pub mod pricing;
pub mod rules;
pub mod service;

pub use pricing::PricingCalculator;
pub use rules::CatalogRules;
pub use service::{ServiceDefinition, ServiceType};
