//! `J_VAPES` storefront library.
//!
//! The storefront widget as a library: a catalog fetched once from the
//! content API, a filterable product grid, a locally persisted cart, and a
//! checkout handoff through a pre-filled chat message.
//!
//! # Architecture
//!
//! - [`filter`] and [`cart`] are pure reducers over plain values
//! - [`checkout`] composes the order message and link from a cart
//! - [`catalog`], [`storage`], and [`render`] are the collaborator
//!   boundaries (content API, key-value store, view output)
//! - [`session::Session`] owns the state and drives everything above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filter;
pub mod render;
pub mod session;
pub mod storage;

pub use error::{Result, StorefrontError};
pub use session::Session;
