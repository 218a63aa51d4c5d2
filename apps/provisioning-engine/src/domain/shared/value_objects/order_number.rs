//! Human-facing order numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique, monotonically increasing order number.
///
/// Format `ORD-######` with a zero-padded sequence. The sequence itself is
/// allocated by the order repository's atomic counter; this type only formats
/// and parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Build an order number from an allocated sequence value.
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("ORD-{sequence:06}"))
    }

    /// Wrap an already-formatted order number (e.g. read from storage).
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the sequence component, if the number is well-formed.
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        self.0.strip_prefix("ORD-")?.parse().ok()
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
