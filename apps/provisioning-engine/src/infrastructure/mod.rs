//! Infrastructure Layer
//!
//! Adapters implementing the domain and application ports.

pub mod persistence;
