// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Provisioning Engine - Rust Core Library
//!
//! Deterministic order and service-instance lifecycle engine for the
//! Network On Demand portal.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `catalog`: Service definitions, bandwidth rules, tiered pricing
//!   - `orders`: Order aggregate, status lifecycle, order numbering
//!   - `provisioning`: Service instances and bandwidth changes
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`ServiceCatalogPort`,
//!     `EventPublisherPort`, identity context)
//!   - `use_cases`: `SubmitOrder`, `CancelOrder`, `ProcessOrder`,
//!     `BandwidthChange`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory repositories with the atomic order-number
//!     sequence and versioned saves

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Engine configuration.
pub mod config;

/// Logging initialization.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::catalog::{CatalogRules, PricingCalculator, ServiceDefinition, ServiceType};
pub use domain::orders::{
    Order, OrderKind, OrderStateMachine, OrderStatus, OrderType, SubmitOrderCommand,
};
pub use domain::provisioning::{BandwidthChange, ChangeStatus, InstanceStatus, ServiceInstance};
pub use domain::shared::{
    Bandwidth, ChangeId, CompanyId, DomainError, InstanceId, Money, OrderId, OrderNumber,
    ServiceId, Timestamp, UserId, WorkflowId,
};

// Application re-exports
pub use application::ports::{
    EventPublisherPort, IdentityContext, NoOpEventPublisher, ServiceCatalogPort,
};
pub use application::use_cases::{
    BandwidthChangeUseCase, CancelOrderUseCase, ProcessOrderUseCase, SubmitOrderRequest,
    SubmitOrderUseCase,
};

// Infrastructure re-exports
pub use infrastructure::persistence::{
    InMemoryBandwidthChangeRepository, InMemoryInstanceRepository, InMemoryOrderRepository,
    InMemoryServiceCatalog,
};

pub use config::EngineConfig;
