//! Checkout handoff.
//!
//! The order is sent as a pre-filled chat message:
//!
//! ```text
//! https://wa.me/<phone>?text=<percent-encoded message>
//! ```
//!
//! Line prices are taken from the cart as-is; nothing is repriced here.

use std::fmt::Write as _;

use url::Url;

use crate::cart::Cart;
use crate::config::CheckoutConfig;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Separator printed under the order total.
const RULE: &str = "--------------------------";

/// Compose the order message for `cart`.
///
/// The message is composed even for an empty cart; [`checkout_link`] is the
/// gate that refuses to hand off an empty order.
#[must_use]
pub fn compose_order_message(cart: &Cart, config: &CheckoutConfig) -> String {
    let mut message = format!("*NEW ORDER - {}*\n\n", config.store_name);

    for line in cart.lines() {
        // Writing to a String cannot fail.
        let _ = write!(
            message,
            "▫️ {}\n   Flavor: {}\n   Qty: {} x {}\n\n",
            line.name,
            line.flavor(),
            line.quantity,
            line.unit_price.shillings()
        );
    }

    let total = cart.totals().total_price;
    let _ = write!(
        message,
        "*TOTAL ESTIMATE: KES {}*\n{RULE}\n📍 Location: \n{}",
        total.grouped(),
        config.delivery_note
    );
    message
}

/// Build the chat link that carries the order message.
///
/// Returns `None` for an empty cart.
#[must_use]
pub fn checkout_link(cart: &Cart, config: &CheckoutConfig) -> Option<Url> {
    if cart.is_empty() {
        return None;
    }

    let message = compose_order_message(cart, config);
    let link = format!(
        "{WHATSAPP_BASE}{}?text={}",
        config.whatsapp_number,
        urlencoding::encode(&message)
    );

    match Url::parse(&link) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build checkout link");
            None
        }
    }
}
