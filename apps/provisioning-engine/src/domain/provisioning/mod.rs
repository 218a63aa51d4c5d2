//! Provisioning Bounded Context
//!
//! Live service instances and the audited bandwidth changes applied to them.
//!
//! # Key Concepts
//!
//! - **ServiceInstance Aggregate**: A company's billable subscription to a
//!   catalog service, with its own provisioning lifecycle
//! - **BandwidthChange Aggregate**: An audit record of a bandwidth mutation,
//!   with a small state machine of its own
//! - **Single mutation path**: `ServiceInstance::update_bandwidth` is the only
//!   way an instance's billed bandwidth changes

pub mod change;
pub mod events;
pub mod instance;
pub mod repository;

pub use change::{BandwidthChange, ChangeStatus, ReconstitutedChangeParams};
pub use events::{
    BandwidthUpdated, InstanceEvent, InstanceProvisioned, InstanceReactivated, InstanceSuspended,
    InstanceTerminated,
};
pub use instance::{InstanceStatus, ReconstitutedInstanceParams, ServiceInstance};
pub use repository::{BandwidthChangeRepository, InstanceRepository};
