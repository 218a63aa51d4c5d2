//! Catalog service definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Bandwidth, Money, ServiceId};

/// Network product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    /// Fiber broadband connectivity.
    Fiber,
    /// Managed site-to-site VPN.
    Vpn,
    /// Dedicated point-to-point link.
    Dedicated,
    /// Software-defined WAN overlay.
    Sdwan,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fiber => write!(f, "FIBER"),
            Self::Vpn => write!(f, "VPN"),
            Self::Dedicated => write!(f, "DEDICATED"),
            Self::Sdwan => write!(f, "SDWAN"),
        }
    }
}

/// A catalog-level network product definition.
///
/// Immutable reference data from the workflow's perspective: the engine reads
/// bounds, pricing and availability from it and never writes back.
/// Invariant: `min <= base <= max` whenever the bounds are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Catalog identifier.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Optional marketing description.
    pub description: Option<String>,
    /// Product category.
    pub service_type: ServiceType,
    /// Bandwidth included in the base price.
    pub base_bandwidth: Option<Bandwidth>,
    /// Lowest orderable bandwidth, when bounded below.
    pub min_bandwidth: Option<Bandwidth>,
    /// Highest orderable bandwidth, when bounded above.
    pub max_bandwidth: Option<Bandwidth>,
    /// Recurring monthly price at the base bandwidth.
    pub base_price_monthly: Option<Money>,
    /// Rate per Mbps above the base bandwidth.
    pub price_per_mbps: Option<Money>,
    /// One-off installation fee.
    pub setup_fee: Option<Money>,
    /// Contract duration in months.
    pub contract_term_months: Option<u32>,
    /// Whether live instances of this service may change bandwidth.
    pub bandwidth_adjustable: bool,
    /// Whether the service can currently be ordered.
    pub available: bool,
    /// Expected provisioning lead time in hours.
    pub provisioning_time_hours: Option<u32>,
}

impl ServiceDefinition {
    /// Whether live instances of this service may change bandwidth.
    #[must_use]
    pub const fn is_bandwidth_adjustable(&self) -> bool {
        self.bandwidth_adjustable
    }

    /// Whether the service can currently be ordered.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Validate the definition itself.
    ///
    /// Catalog data arrives from an external system; a corrupt entry must
    /// surface as a typed error rather than feed nonsense into pricing.
    ///
    /// # Errors
    ///
    /// Returns error if a price is negative or the bandwidth bounds are not
    /// ordered `min <= base <= max`.
    pub fn validate(&self) -> Result<(), crate::domain::shared::DomainError> {
        use crate::domain::shared::DomainError;

        if let Some(price) = self.base_price_monthly {
            price.validate_as_price("base_price_monthly")?;
        }
        if let Some(rate) = self.price_per_mbps {
            rate.validate_as_price("price_per_mbps")?;
        }
        if let Some(fee) = self.setup_fee {
            fee.validate_as_price("setup_fee")?;
        }

        let ordered = match (self.min_bandwidth, self.base_bandwidth, self.max_bandwidth) {
            (Some(min), Some(base), _) if min > base => false,
            (_, Some(base), Some(max)) if base > max => false,
            (Some(min), None, Some(max)) if min > max => false,
            _ => true,
        };
        if !ordered {
            return Err(DomainError::InvalidValue {
                field: "bandwidth_bounds".to_string(),
                message: "bounds must satisfy min <= base <= max".to_string(),
            });
        }
        Ok(())
    }
}
