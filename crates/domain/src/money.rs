//! Prices and order totals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of money in minor units (cents, kopiykas), so totals stay exact.
///
/// Arithmetic is checked: prices come from callers, and a total that does not
/// fit in an `i64` is reported instead of wrapping. Serialized as the bare
/// integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Price of `quantity` items at this unit price, or None on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Sum of two amounts, or None on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_cents(12345).to_string(), "123.45");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_line_totals() {
        let price = Money::from_cents(2550);
        let total = price
            .checked_multiply(4)
            .and_then(|t| t.checked_add(Money::from_cents(1575).checked_multiply(3)?))
            .unwrap();

        assert_eq!(total.cents(), 10200 + 4725);
        assert!(Money::from_cents(100).checked_multiply(0).unwrap().is_zero());
    }

    #[test]
    fn test_multiply_overflow_is_none() {
        let price = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(price.checked_multiply(2), None);
        assert_eq!(price.checked_multiply(1), Some(price));
    }

    #[test]
    fn test_add_overflow_is_none() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!(big.checked_add(Money::from_cents(1)), None);
        assert_eq!(big.checked_add(Money::ZERO), Some(big));
    }

    #[test]
    fn test_negative_detection() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(999)).unwrap();
        assert_eq!(json, "999");
        let back: Money = serde_json::from_str("999").unwrap();
        assert_eq!(back, Money::from_cents(999));
    }
}
