//! Checkout handoff.

use jvapes_storefront::render::{EMPTY_CART_MESSAGE, HtmlRenderer};
use jvapes_storefront::{Session, StorefrontError};

use crate::console;

/// Print the order message and the link that sends it.
pub fn run(session: &Session<HtmlRenderer>) {
    match session.checkout_link() {
        Ok(link) => {
            console::print(&session.order_message());
            console::print("");
            console::print(&format!("Open to send your order: {link}"));
        }
        Err(StorefrontError::EmptyCart) => console::print(EMPTY_CART_MESSAGE),
        Err(e) => console::print(&e.to_string()),
    }
}
