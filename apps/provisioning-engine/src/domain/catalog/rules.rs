//! Catalog validation rules.

use super::service::ServiceDefinition;
use crate::domain::shared::{Bandwidth, DomainError};

/// Pure predicates over catalog definitions, consumed by the order and
/// provisioning workflows before any persistence happens.
pub struct CatalogRules;

impl CatalogRules {
    /// Whether the requested bandwidth is orderable for this service.
    ///
    /// Fails closed: a missing bandwidth is invalid. When a bound is absent
    /// the check is open on that side.
    #[must_use]
    pub fn is_valid_bandwidth(service: &ServiceDefinition, bandwidth: Option<Bandwidth>) -> bool {
        let Some(bandwidth) = bandwidth else {
            return false;
        };

        if let Some(min) = service.min_bandwidth {
            if bandwidth < min {
                return false;
            }
        }

        if let Some(max) = service.max_bandwidth {
            if bandwidth > max {
                return false;
            }
        }

        true
    }

    /// Whether the service can currently be ordered.
    #[must_use]
    pub fn is_orderable(service: &ServiceDefinition) -> bool {
        service.is_available()
    }

    /// Validate a requested bandwidth, mapping a failed check to the typed
    /// rejection carried back to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBandwidth`] when the check fails.
    pub fn validate_bandwidth(
        service: &ServiceDefinition,
        bandwidth: Option<Bandwidth>,
    ) -> Result<Bandwidth, DomainError> {
        if Self::is_valid_bandwidth(service, bandwidth) {
            // is_valid_bandwidth fails closed on None
            bandwidth.ok_or_else(|| DomainError::InvalidBandwidth {
                requested_mbps: None,
                min_mbps: service.min_bandwidth.map(|b| b.mbps()),
                max_mbps: service.max_bandwidth.map(|b| b.mbps()),
            })
        } else {
            Err(DomainError::InvalidBandwidth {
                requested_mbps: bandwidth.map(|b| b.mbps()),
                min_mbps: service.min_bandwidth.map(|b| b.mbps()),
                max_mbps: service.max_bandwidth.map(|b| b.mbps()),
            })
        }
    }
}
