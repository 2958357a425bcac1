//! Rendering boundary.
//!
//! The session computes view state and pushes it through [`Renderer`]; it
//! never builds markup itself. [`HtmlRenderer`] turns the latest state into a
//! full page with askama templates. Other hosts (the CLI console, tests)
//! provide their own implementations.

mod html;
mod view;

pub use html::{GridState, HtmlRenderer};
pub use view::{
    CATALOG_ERROR_MESSAGE, CartLineView, CartView, EMPTY_CART_MESSAGE, FilterOption,
    FilterOptionsView, ProductCardView, STANDARD_FLAVOR_LABEL, product_cards,
};

/// Receives view state from the session.
pub trait Renderer: Send {
    /// Paint the visible products. Never called with an empty list.
    fn render_products(&mut self, cards: &[ProductCardView]);

    /// No product matches the current filters.
    fn render_empty(&mut self);

    /// The catalog failed to load; the grid stays disabled for the session.
    fn render_catalog_unavailable(&mut self, message: &str);

    /// Search box and dropdown contents.
    fn render_filter_options(&mut self, options: &FilterOptionsView);

    /// Cart drawer and header badge.
    fn render_cart(&mut self, cart: &CartView);

    /// Brief confirmation after an item was added.
    fn show_added_toast(&mut self);

    /// Show or hide the age gate.
    fn render_age_gate(&mut self, visible: bool);
}
