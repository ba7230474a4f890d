//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stock-keeping unit: the primary key of an item.
///
/// Free-form, but never empty or surrounded by whitespace. Ordering is plain
/// lexicographic string order, which is the catalog's listing order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("sku", "cannot be empty"));
        }
        if trimmed.len() != value.len() {
            return Ok(Self(trimmed.to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_rejects_blank_values() {
        assert!(matches!(
            Sku::new("   ").unwrap_err(),
            DomainError::InvalidField { field: "sku", .. }
        ));
    }

    #[test]
    fn sku_trims_surrounding_whitespace() {
        assert_eq!(Sku::new(" UQ001 ").unwrap().as_str(), "UQ001");
    }

    #[test]
    fn sku_orders_lexicographically() {
        let mut skus = vec![Sku::new("UQ010").unwrap(), Sku::new("UQ002").unwrap()];
        skus.sort();
        assert_eq!(skus[0].as_str(), "UQ002");
    }
}
