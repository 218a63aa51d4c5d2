//! Domain errors for the provisioning engine.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns. All of them are
/// recoverable at the caller's boundary: the excluded presentation layer maps
/// them to client-facing rejections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced entity does not exist.
    NotFound {
        /// Entity type (e.g., "Order").
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Service exists but is not orderable.
    Unavailable {
        /// Catalog service identifier.
        service_id: String,
    },

    /// Requested bandwidth fails the catalog bounds.
    InvalidBandwidth {
        /// Requested value in Mbps, if one was supplied.
        requested_mbps: Option<u32>,
        /// Lower bound of the service, if defined.
        min_mbps: Option<u32>,
        /// Upper bound of the service, if defined.
        max_mbps: Option<u32>,
    },

    /// Cross-company access attempted.
    Forbidden {
        /// Entity type.
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Illegal state transition attempted on a gated entry point.
    InvalidState {
        /// Entity type.
        entity: String,
        /// Current state.
        from: String,
        /// Attempted action.
        action: String,
    },

    /// Concurrent-modification retry exhausted.
    Conflict {
        /// Entity type.
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl DomainError {
    /// Convenience constructor for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`DomainError::Forbidden`].
    #[must_use]
    pub fn forbidden(entity: &str, id: impl fmt::Display) -> Self {
        Self::Forbidden {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`DomainError::InvalidState`].
    #[must_use]
    pub fn invalid_state(entity: &str, from: impl fmt::Display, action: &str) -> Self {
        Self::InvalidState {
            entity: entity.to_string(),
            from: from.to_string(),
            action: action.to_string(),
        }
    }

    /// Convenience constructor for [`DomainError::Conflict`].
    #[must_use]
    pub fn conflict(entity: &str, id: impl fmt::Display) -> Self {
        Self::Conflict {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => {
                write!(f, "{entity} not found: {id}")
            }
            Self::Unavailable { service_id } => {
                write!(f, "Service is not available: {service_id}")
            }
            Self::InvalidBandwidth {
                requested_mbps,
                min_mbps,
                max_mbps,
            } => match requested_mbps {
                Some(mbps) => write!(
                    f,
                    "Invalid bandwidth {mbps} Mbps (allowed: {} - {})",
                    min_mbps.map_or_else(|| "any".to_string(), |m| m.to_string()),
                    max_mbps.map_or_else(|| "any".to_string(), |m| m.to_string()),
                ),
                None => write!(f, "Bandwidth is required"),
            },
            Self::Forbidden { entity, id } => {
                write!(f, "{entity} {id} does not belong to your company")
            }
            Self::InvalidState { entity, from, action } => {
                write!(f, "Cannot {action} {entity} in status {from}")
            }
            Self::Conflict { entity, id } => {
                write!(f, "Concurrent modification of {entity} {id}")
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
