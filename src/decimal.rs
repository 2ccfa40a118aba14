use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Money type for token amounts, held as whole base units (wei, cents, lamports)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from a whole number of base units
    pub fn from_units(amount: u64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from decimal, truncating to whole base units
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.trunc())
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// truncating division by a whole-number divisor; the remainder is dropped
    pub fn floor_div(self, divisor: u32) -> Money {
        Money((self.0 / Decimal::from(divisor)).floor())
    }

    /// multiply by a whole-number factor
    pub fn mul_int(self, factor: u64) -> Money {
        Money(self.0 * Decimal::from(factor))
    }

    /// how many whole units of `unit` fit into this amount; `unit` must be nonzero
    pub fn whole_units_of(self, unit: Money) -> u64 {
        (self.0 / unit.0).floor().to_u64().unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Money::from_units(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

/// fixed-point percentage with three implied decimals (500 denotes a ratio of 0.500)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    /// implied decimals carried by every rate value
    pub const SCALE: u32 = 3;

    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from a scaled value (600 = a ratio of 0.600)
    pub fn from_scaled(value: u64) -> Self {
        Rate(Decimal::from(value))
    }

    /// create from an already-scaled decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// the scaled fixed-point value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// the plain ratio this rate denotes
    pub fn as_ratio(&self) -> Decimal {
        self.0 / Decimal::from(10u64.pow(Self::SCALE))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_ratio() * Decimal::from(100))
    }
}
