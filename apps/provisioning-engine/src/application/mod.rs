//! Application Layer
//!
//! Use cases orchestrating the domain, and the ports they reach external
//! systems through.

pub mod ports;
pub mod use_cases;
