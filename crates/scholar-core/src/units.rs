//! # Scores and Amounts
//!
//! [`Gpa`] is an integer score scaled by 100 (`350` is a 3.50 GPA). [`Amount`]
//! counts the smallest currency unit. Neither type implements the arithmetic
//! operators: amounts only combine through `checked_*` methods.

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) for a pool's required GPA: a 4.00 average.
pub const MAX_REQUIRED_GPA: Gpa = Gpa::new(400);

// ─── Gpa ─────────────────────────────────────────────────────────────

/// A grade-point average scaled by 100.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gpa(u32);

impl Gpa {
    /// Wrap a scaled score.
    pub const fn new(scaled: u32) -> Self {
        Self(scaled)
    }

    /// The scaled score.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this score satisfies `required` (inclusive).
    pub fn meets(self, required: Gpa) -> bool {
        self.0 >= required.0
    }
}

impl std::fmt::Display for Gpa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ─── Amount ──────────────────────────────────────────────────────────

/// A currency amount in smallest units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw amount.
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// The raw amount.
    pub const fn get(self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self + rhs`, or `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `self - rhs`, or `None` if `rhs` exceeds `self`.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// `self * factor`, or `None` on overflow.
    pub fn checked_mul(self, factor: u32) -> Option<Amount> {
        self.0.checked_mul(u128::from(factor)).map(Self)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(u128::from(units))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gpa_display_two_decimals() {
        assert_eq!(Gpa::new(350).to_string(), "3.50");
        assert_eq!(Gpa::new(305).to_string(), "3.05");
        assert_eq!(Gpa::new(400).to_string(), "4.00");
        assert_eq!(Gpa::new(0).to_string(), "0.00");
    }

    #[test]
    fn gpa_meets_is_inclusive() {
        let required = Gpa::new(350);
        assert!(Gpa::new(350).meets(required));
        assert!(Gpa::new(370).meets(required));
        assert!(!Gpa::new(349).meets(required));
    }

    #[test]
    fn max_required_gpa_is_four_point_oh() {
        assert_eq!(MAX_REQUIRED_GPA.get(), 400);
    }

    #[test]
    fn amount_checked_sub_underflow() {
        assert_eq!(Amount::new(5).checked_sub(Amount::new(6)), None);
        assert_eq!(
            Amount::new(5).checked_sub(Amount::new(5)),
            Some(Amount::ZERO)
        );
    }

    #[test]
    fn amount_checked_mul_overflow() {
        assert_eq!(Amount::new(u128::MAX).checked_mul(2), None);
        assert_eq!(
            Amount::new(1_000_000_000).checked_mul(4),
            Some(Amount::new(4_000_000_000))
        );
    }

    #[test]
    fn amount_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Amount::new(12)).unwrap(), "12");
    }

    proptest! {
        /// Multiplication then repeated subtraction returns to zero.
        #[test]
        fn amount_mul_then_sub_drains(per in 1u64.., n in 1u32..64) {
            let per = Amount::from(per);
            let mut total = per.checked_mul(n).unwrap();
            for _ in 0..n {
                total = total.checked_sub(per).unwrap();
            }
            prop_assert!(total.is_zero());
        }

        /// Addition is checked, never wrapping.
        #[test]
        fn amount_add_never_wraps(a in any::<u128>(), b in any::<u128>()) {
            match Amount::new(a).checked_add(Amount::new(b)) {
                Some(sum) => prop_assert!(sum.get() >= a && sum.get() >= b),
                None => prop_assert!(a.checked_add(b).is_none()),
            }
        }
    }
}
