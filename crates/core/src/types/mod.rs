//! Core types for the J_VAPES storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod puff;

pub use id::ProductId;
pub use price::{Discount, Kes, PriceError, discounted_price};
pub use puff::{PuffCount, PuffCountError};
