//! Whole and decimal amounts
//!
//! BTC Markets transmits monetary values in request and account payloads as
//! integers scaled by 10^8 ("whole" units). Market data endpoints instead
//! return plain JSON numbers. [`AmountWhole`] models the former and
//! [`AmountDecimal`] the latter; conversion between them is an exact scale by
//! 10^8 because the decimal side is a `rust_decimal::Decimal`, not a float.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

use crate::error::AmountError;

/// Number of decimal places carried by a whole-unit amount
pub const WHOLE_SCALE: u32 = 8;

/// Multiplier between decimal and whole units (10^8)
pub const WHOLE_UNITS_PER_DECIMAL: i64 = 100_000_000;

/// Amount scaled by 10^8, as used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountWhole(pub i64);

/// Amount in human (decimal) units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AmountDecimal(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

impl AmountWhole {
    /// Zero amount
    pub const ZERO: AmountWhole = AmountWhole(0);

    /// Create a whole amount from its raw scaled value
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw scaled value
    pub fn raw(&self) -> i64 {
        self.0
    }

    /// Convert to decimal units (exact)
    pub fn to_decimal(self) -> AmountDecimal {
        AmountDecimal(Decimal::new(self.0, WHOLE_SCALE))
    }

    /// Returns true if the decimal form has no more than `places` decimals
    pub fn has_at_most_decimals(&self, places: u32) -> bool {
        if places >= WHOLE_SCALE {
            return true;
        }
        let step = 10_i64.pow(WHOLE_SCALE - places);
        self.0 % step == 0
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl AmountDecimal {
    /// Zero amount
    pub const ZERO: AmountDecimal = AmountDecimal(Decimal::ZERO);

    /// Create a decimal amount
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a decimal amount from a float
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        Decimal::from_f64(value)
            .map(Self)
            .ok_or_else(|| AmountError::NotFinite(value.to_string()))
    }

    /// Inner decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion to a float, for display or statistics
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Convert to whole units, rounding half away from zero
    pub fn to_whole(self) -> Result<AmountWhole, AmountError> {
        let overflow = || AmountError::Overflow(self.0.to_string());

        let scaled = self
            .0
            .checked_mul(Decimal::from(WHOLE_UNITS_PER_DECIMAL))
            .ok_or_else(overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        scaled.to_i64().map(AmountWhole).ok_or_else(overflow)
    }
}

/// Convert a whole-unit amount into decimal units
pub fn whole_to_decimal(amount: AmountWhole) -> AmountDecimal {
    amount.to_decimal()
}

/// Convert a decimal amount into whole units
pub fn decimal_to_whole(amount: AmountDecimal) -> Result<AmountWhole, AmountError> {
    amount.to_whole()
}

impl From<Decimal> for AmountDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<AmountWhole> for AmountDecimal {
    fn from(value: AmountWhole) -> Self {
        value.to_decimal()
    }
}

impl TryFrom<AmountDecimal> for AmountWhole {
    type Error = AmountError;

    fn try_from(value: AmountDecimal) -> Result<Self, Self::Error> {
        value.to_whole()
    }
}

impl Mul for AmountDecimal {
    type Output = AmountDecimal;

    fn mul(self, rhs: Self) -> Self::Output {
        AmountDecimal(self.0 * rhs.0)
    }
}

impl fmt::Display for AmountDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl fmt::Display for AmountWhole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use proptest::prelude::*;

    #[test]
    fn test_whole_to_decimal() {
        assert_eq!(AmountWhole(100_000_000).to_decimal().value(), dec!(1));
        assert_eq!(AmountWhole(12_345).to_decimal().value(), dec!(0.00012345));
        assert_eq!(AmountWhole(-250_000_000).to_decimal().value(), dec!(-2.5));
    }

    #[test]
    fn test_decimal_to_whole() {
        assert_eq!(decimal_to_whole(AmountDecimal(dec!(1.5))).unwrap(), AmountWhole(150_000_000));
        assert_eq!(decimal_to_whole(AmountDecimal(dec!(0.00000001))).unwrap(), AmountWhole(1));
        // Sub-unit precision rounds half away from zero
        assert_eq!(decimal_to_whole(AmountDecimal(dec!(0.000000005))).unwrap(), AmountWhole(1));
        assert_eq!(decimal_to_whole(AmountDecimal(dec!(-0.000000005))).unwrap(), AmountWhole(-1));
    }

    #[test]
    fn test_round_trip_is_exact() {
        let samples = [
            0,
            1,
            -1,
            99,
            100_000_000,
            123_456_789_012,
            -987_654_321_098,
            9_007_199_254_740_993, // beyond f64 integer precision
            i64::MAX,
            i64::MIN,
            i64::MIN + 1,
        ];
        for raw in samples {
            let whole = AmountWhole(raw);
            assert_eq!(decimal_to_whole(whole_to_decimal(whole)).unwrap(), whole, "raw = {raw}");
        }
    }

    proptest! {
        #[test]
        fn prop_whole_round_trip(raw in any::<i64>()) {
            let whole = AmountWhole(raw);
            prop_assert_eq!(decimal_to_whole(whole_to_decimal(whole)).unwrap(), whole);
        }
    }

    #[test]
    fn test_decimal_to_whole_overflow() {
        let huge = AmountDecimal(Decimal::MAX);
        assert!(matches!(huge.to_whole(), Err(AmountError::Overflow(_))));

        let just_over = AmountDecimal(dec!(92233720368.54775808));
        assert!(just_over.to_whole().is_err());
    }

    #[test]
    fn test_has_at_most_decimals() {
        assert!(AmountWhole(130_000_000_000).has_at_most_decimals(2));
        assert!(AmountWhole(130_010_000_000).has_at_most_decimals(2));
        assert!(!AmountWhole(130_000_100_000).has_at_most_decimals(2));
        assert!(!AmountWhole(130_001_000_000).has_at_most_decimals(1));
        assert!(AmountWhole(1).has_at_most_decimals(8));
    }

    #[test]
    fn test_decimal_serde_as_number() {
        let parsed: AmountDecimal = serde_json::from_str("5000.5").unwrap();
        assert_eq!(parsed.value(), dec!(5000.5));

        let integer: AmountDecimal = serde_json::from_str("42").unwrap();
        assert_eq!(integer.value(), dec!(42));

        let json = serde_json::to_string(&AmountDecimal(dec!(1.25))).unwrap();
        assert_eq!(json, "1.25");
    }

    #[test]
    fn test_whole_serde_as_integer() {
        let parsed: AmountWhole = serde_json::from_str("150000000").unwrap();
        assert_eq!(parsed, AmountWhole(150_000_000));
        assert!(serde_json::from_str::<AmountWhole>("1.5").is_err());
    }

    #[test]
    fn test_display_and_mul() {
        let amount = AmountDecimal(dec!(2.50000000));
        assert_eq!(amount.to_string(), "2.5");
        assert_eq!((amount * AmountDecimal(dec!(4))).value(), dec!(10));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(AmountDecimal::from_f64(0.5).unwrap().value(), dec!(0.5));
        assert!(AmountDecimal::from_f64(f64::NAN).is_err());
    }
}
