//! J_VAPES Core - Shared types library.
//!
//! This crate provides common types used across the J_VAPES components:
//! - `storefront` - Catalog filtering, cart reducer, checkout and session driver
//! - `cli` - Command-line host that runs a storefront session
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, KES amounts, discounts, and puff counts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
