//! Money type for player prices and team budgets

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Money represents an amount in thousands of currency units
///
/// Prices are quoted in millions (e.g. 7.5M) so thousands keep every
/// realistic price exact in integer arithmetic: 7.5M = 7_500 thousands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    pub thousands: i64,
}

impl Money {
    pub const ZERO: Money = Money { thousands: 0 };

    /// Create an amount from thousands
    pub fn from_thousands(thousands: i64) -> Self {
        Self { thousands }
    }

    /// Create an amount from whole millions
    pub fn from_millions(millions: i64) -> Self {
        Self { thousands: millions * 1000 }
    }

    /// Create from a decimal number of millions, truncating below one thousand
    pub fn from_decimal_millions(millions: Decimal) -> Self {
        let thousands = (millions * Decimal::from(1000)).trunc().to_i64().unwrap_or(0);
        Self { thousands }
    }

    /// Get the value as a decimal number of millions
    pub fn to_decimal_millions(self) -> Decimal {
        Decimal::from(self.thousands) / Decimal::from(1000)
    }

    pub fn is_zero(self) -> bool {
        self.thousands == 0
    }

    pub fn is_positive(self) -> bool {
        self.thousands > 0
    }

    pub fn is_negative(self) -> bool {
        self.thousands < 0
    }

    /// Subtraction that floors at zero
    pub fn safe_sub(self, other: Self) -> Self {
        Self { thousands: (self.thousands - other.thousands).max(0) }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self { thousands: self.thousands + other.thousands }
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self { thousands: self.thousands - other.thousands }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.thousands += other.thousands;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.thousands -= other.thousands;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self { thousands: -self.thousands }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, amount| acc + amount)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}M", self.to_decimal_millions().normalize())
    }
}
