//! Use Cases
//!
//! One use case per exposed operation. Each loads aggregates through the
//! repository ports, drives domain transitions, saves under optimistic
//! concurrency (retrying per [`crate::config::EngineConfig`]) and publishes
//! drained events.

mod bandwidth_change;
mod cancel_order;
mod process_order;
mod submit_order;

pub use bandwidth_change::BandwidthChangeUseCase;
pub use cancel_order::CancelOrderUseCase;
pub use process_order::ProcessOrderUseCase;
pub use submit_order::{SubmitOrderRequest, SubmitOrderUseCase};
