//! Money Module
//!
//! `Amount` is the only way a monetary value enters the ledger. It wraps a
//! `rust_decimal::Decimal` and is strictly positive by construction, so
//! movements, transfers and compensations never carry zero or negative values.
//! Amounts are stored as `NUMERIC(18, 2)`, so finer precision is refused
//! rather than rounded.
//!
//! ## Wire format
//! - Accepts a JSON number (`10.5`) or a JSON string (`"10.50"`)
//! - Serializes as a decimal string to avoid float round-trips

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount allows at most {max} decimal places, got {got}")]
    TooPrecise { got: u32, max: u32 },

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
}

/// Decimal places kept by every amount column
pub const MAX_SCALE: u32 = 2;

/// Strictly positive monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Create a new amount, rejecting zero, negative and sub-cent values
    ///
    /// Trailing zeros do not count: `10.500` is accepted as `10.5`.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::InvalidAmount);
        }
        let scale = value.normalize().scale();
        if scale > MAX_SCALE {
            return Err(MoneyError::TooPrecise {
                got: scale,
                max: MAX_SCALE,
            });
        }
        Ok(Self(value))
    }

    /// Get the inner Decimal value
    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::InvalidFormat("empty string".to_string()));
        }
        let value =
            Decimal::from_str(trimmed).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            String(String),
            Number(f64),
        }

        match DecimalOrString::deserialize(deserializer)? {
            DecimalOrString::String(s) => Amount::from_str(&s).map_err(D::Error::custom),
            DecimalOrString::Number(n) => {
                // Go through the shortest float representation so 10.1 stays 10.1
                let value = Decimal::from_str(&n.to_string())
                    .map_err(|e| D::Error::custom(MoneyError::InvalidFormat(e.to_string())))?;
                Amount::new(value).map_err(D::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(Amount::new(Decimal::ZERO), Err(MoneyError::InvalidAmount));
        assert_eq!(Amount::new(Decimal::new(-1, 0)), Err(MoneyError::InvalidAmount));
        assert!(Amount::new(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_rejects_sub_cent_precision() {
        assert_eq!(
            Amount::new(Decimal::new(10005, 3)),
            Err(MoneyError::TooPrecise { got: 3, max: 2 })
        );
        assert!(matches!(
            Amount::new(Decimal::new(1, 3)),
            Err(MoneyError::TooPrecise { .. })
        ));
        assert!(matches!("0.001".parse::<Amount>(), Err(MoneyError::TooPrecise { .. })));

        // Trailing zeros beyond two places are harmless
        assert_eq!(
            Amount::new(Decimal::new(10500, 3)).unwrap().value(),
            Decimal::new(10500, 3)
        );
        assert!(serde_json::from_str::<Amount>("10.005").is_err());
    }

    #[test]
    fn test_parse_from_str() {
        let amount: Amount = "10.50".parse().unwrap();
        assert_eq!(amount.value(), Decimal::new(1050, 2));

        assert!(matches!("".parse::<Amount>(), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!("abc".parse::<Amount>(), Err(MoneyError::InvalidFormat(_))));
        assert_eq!("-3".parse::<Amount>(), Err(MoneyError::InvalidAmount));
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Amount = serde_json::from_str("10.1").unwrap();
        assert_eq!(from_number.value(), Decimal::new(101, 1));

        let from_string: Amount = serde_json::from_str("\"10.10\"").unwrap();
        assert_eq!(from_string.value(), Decimal::new(1010, 2));

        assert!(serde_json::from_str::<Amount>("0").is_err());
        assert!(serde_json::from_str::<Amount>("\"\"").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let amount = Amount::new(Decimal::new(1000, 2)).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"10.00\"");
    }
}
