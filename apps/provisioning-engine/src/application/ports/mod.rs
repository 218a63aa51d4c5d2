//! Application Ports
//!
//! Interfaces to the systems this core consumes but does not implement:
//! the catalog lookup, the authenticated caller's identity, and the event
//! sink.

mod catalog;
mod event_publisher;
mod identity;

pub use catalog::ServiceCatalogPort;
pub use event_publisher::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use identity::IdentityContext;
