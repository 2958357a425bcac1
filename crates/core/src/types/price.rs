//! Kenyan shilling amounts, percent discounts, and the shared discount formula.
//!
//! Every price in the storefront is a whole number of shillings. Discounts are
//! applied with decimal arithmetic and rounded half up, and the same
//! [`discounted_price`] function is used by catalog filtering and by the cart,
//! so the price a product is filtered on is the price it enters the cart at.

use core::fmt;
use core::iter::Sum;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Kes`] amount or a [`Discount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount must be greater than zero.
    #[error("price must be a positive number of shillings")]
    NotPositive,
    /// The discount is outside 0-100 or not a number.
    #[error("discount must be between 0 and 100 percent (got {0})")]
    DiscountOutOfRange(String),
}

/// An amount in whole Kenyan shillings.
///
/// Displays as `KES 1,600` (thousands grouped with commas).
///
/// ```
/// use jvapes_core::Kes;
///
/// assert_eq!(Kes::new(1600).to_string(), "KES 1,600");
/// assert_eq!(Kes::new(1600).grouped(), "1,600");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Kes(u64);

impl Kes {
    /// Zero shillings.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole shillings.
    #[must_use]
    pub const fn new(shillings: u64) -> Self {
        Self(shillings)
    }

    /// Create a strictly positive amount, as required for catalog base prices.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero.
    pub const fn positive(shillings: u64) -> Result<Self, PriceError> {
        if shillings == 0 {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(shillings))
    }

    /// Get the amount in whole shillings.
    #[must_use]
    pub const fn shillings(self) -> u64 {
        self.0
    }

    /// Multiply a unit price by a quantity, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// The amount with thousands separators and no currency prefix.
    #[must_use]
    pub fn grouped(self) -> String {
        let digits = self.0.to_string();
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for Kes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KES {}", self.grouped())
    }
}

impl Sum for Kes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, k| Self(acc.0.saturating_add(k.0)))
    }
}

/// A percent discount between 0 and 100. Zero means no discount.
///
/// Fractional percentages such as `12.5` are allowed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Maximum discount percentage.
    pub const MAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;

    /// Create a discount from a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::DiscountOutOfRange`] below 0 or above 100.
    pub fn new(percent: impl Into<Decimal>) -> Result<Self, PriceError> {
        let percent = percent.into();
        if percent < Decimal::ZERO || percent > Self::MAX_PERCENT {
            return Err(PriceError::DiscountOutOfRange(percent.normalize().to_string()));
        }
        Ok(Self(percent.normalize()))
    }

    /// Get the percentage.
    #[must_use]
    pub const fn percent(self) -> Decimal {
        self.0
    }

    /// Whether the product is on sale.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = PriceError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl TryFrom<f64> for Discount {
    type Error = PriceError;

    fn try_from(percent: f64) -> Result<Self, Self::Error> {
        Decimal::try_from(percent)
            .map_err(|_| PriceError::DiscountOutOfRange(percent.to_string()))
            .and_then(Self::new)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Apply a percent discount to a base price.
///
/// `price * (100 - discount) / 100`, rounded half up to whole shillings.
/// A zero discount returns the price unchanged.
///
/// ```
/// use jvapes_core::{Discount, Kes, discounted_price};
///
/// let half = Discount::new(50).unwrap();
/// assert_eq!(discounted_price(Kes::new(1000), half), Kes::new(500));
/// assert_eq!(discounted_price(Kes::new(1000), Discount::NONE), Kes::new(1000));
/// ```
#[must_use]
pub fn discounted_price(price: Kes, discount: Discount) -> Kes {
    if !discount.is_active() {
        return price;
    }

    let remaining = Discount::MAX_PERCENT - discount.percent();
    let exact = Decimal::from(price.0) * remaining / Decimal::ONE_HUNDRED;

    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map_or(price, Kes)
}
