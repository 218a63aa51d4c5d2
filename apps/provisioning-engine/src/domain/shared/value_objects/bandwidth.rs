//! Bandwidth value object.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::shared::DomainError;

/// A bandwidth figure in Mbps.
///
/// Plain integer megabits per second. Construction is unchecked; commands
/// that accept caller input run [`Bandwidth::validate`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bandwidth(u32);

impl Bandwidth {
    /// Create a new Bandwidth from an Mbps value.
    #[must_use]
    pub const fn new(mbps: u32) -> Self {
        Self(mbps)
    }

    /// Get the inner Mbps value.
    #[must_use]
    pub const fn mbps(&self) -> u32 {
        self.0
    }

    /// Validate as an orderable bandwidth figure.
    ///
    /// # Errors
    ///
    /// Returns error if the value is below 1 Mbps.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0 == 0 {
            return Err(DomainError::InvalidValue {
                field: "bandwidth_mbps".to_string(),
                message: "bandwidth must be at least 1 Mbps".to_string(),
            });
        }
        Ok(())
    }

    /// Signed difference to another bandwidth, in Mbps.
    #[must_use]
    pub const fn difference(&self, other: Self) -> i64 {
        self.0 as i64 - other.0 as i64
    }

    /// Mbps above another bandwidth, zero when not higher.
    #[must_use]
    pub const fn excess_over(&self, base: Self) -> u32 {
        if self.0 > base.0 { self.0 - base.0 } else { 0 }
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Mbps", self.0)
    }
}

impl PartialOrd for Bandwidth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bandwidth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<u32> for Bandwidth {
    fn from(mbps: u32) -> Self {
        Self(mbps)
    }
}

impl From<Bandwidth> for u32 {
    fn from(bw: Bandwidth) -> Self {
        bw.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_new_and_display() {
        let bw = Bandwidth::new(750);
        assert_eq!(bw.mbps(), 750);
        assert_eq!(format!("{bw}"), "750 Mbps");
    }

    #[test]
    fn bandwidth_validate_zero() {
        assert!(Bandwidth::new(0).validate().is_err());
        assert!(Bandwidth::new(1).validate().is_ok());
    }

    #[test]
    fn bandwidth_difference_signed() {
        let old = Bandwidth::new(500);
        let new = Bandwidth::new(750);

        assert_eq!(new.difference(old), 250);
        assert_eq!(old.difference(new), -250);
        assert_eq!(old.difference(old), 0);
    }

    #[test]
    fn bandwidth_excess_over() {
        let base = Bandwidth::new(500);
        assert_eq!(Bandwidth::new(750).excess_over(base), 250);
        assert_eq!(Bandwidth::new(500).excess_over(base), 0);
        assert_eq!(Bandwidth::new(300).excess_over(base), 0);
    }

    #[test]
    fn bandwidth_ordering() {
        assert!(Bandwidth::new(100) < Bandwidth::new(1000));
        assert_eq!(Bandwidth::new(500), Bandwidth::new(500));
    }

    #[test]
    fn bandwidth_serde_roundtrip() {
        let bw = Bandwidth::new(500);
        let json = serde_json::to_string(&bw).unwrap();
        assert_eq!(json, "500");

        let parsed: Bandwidth = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bw);
    }

    #[test]
    fn bandwidth_from_u32() {
        let bw: Bandwidth = 300u32.into();
        assert_eq!(u32::from(bw), 300);
    }
}
