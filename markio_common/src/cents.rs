use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The currency used for checkout sessions when none is specified by the processor.
pub const DEFAULT_CURRENCY: &str = "eur";

//--------------------------------------        Cents         ---------------------------------------------------------
/// An amount of money expressed in the minor unit of its currency (e.g. euro cents). This is the representation used
/// by the database and by the payment processor API.
///
/// Amounts entered by users are decimals in the major unit. Use [`Cents::from_decimal`] to convert them.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, SubAssign, sub_assign);
op!(unary Cents, Neg, neg);

impl Mul<i64> for Cents {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor currency units: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<Decimal> for Cents {
    type Error = CentsConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts an amount in major units into minor units: multiply by 100 and round to the nearest integer, with
    /// midpoints rounded away from zero. The conversion is exact for amounts with at most two decimal places.
    pub fn from_decimal(amount: Decimal) -> Result<Self, CentsConversionError> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_i64())
            .map(Self)
            .ok_or_else(|| CentsConversionError(format!("{amount} is out of range")))
    }

    /// The amount in major units, with two decimal places.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns `percentage`% of this amount, truncated towards zero, or `None` if the result does not fit.
    pub fn percentage(&self, percentage: u32) -> Option<Self> {
        let share = i128::from(self.0) * i128::from(percentage) / 100;
        i64::try_from(share).ok().map(Self)
    }
}
