//! Cart commands.

use jvapes_core::ProductId;
use jvapes_storefront::Session;
use jvapes_storefront::cart::CartLineKey;
use jvapes_storefront::render::HtmlRenderer;

use crate::console;

/// Print the cart.
pub fn show(session: &Session<HtmlRenderer>) {
    console::print(&console::cart(session.renderer().cart()));
}

/// Add one unit of a product.
pub async fn add(session: &mut Session<HtmlRenderer>, product_id: &str, flavor: Option<&str>) {
    match session.add_to_cart(&ProductId::new(product_id), flavor).await {
        Ok(()) => {
            if session.renderer().toast_visible() {
                console::print(console::ADDED_TOAST);
            }
        }
        // Already logged by the session; the user only needs the reason.
        Err(e) => console::print(&e.to_string()),
    }
    show(session);
}

/// Remove a line.
pub async fn remove(session: &mut Session<HtmlRenderer>, product_id: &str, flavor: Option<&str>) {
    let key = line_key(session, product_id, flavor);
    session.remove_line(&key).await;
    show(session);
}

/// Change a line's quantity.
pub async fn adjust(
    session: &mut Session<HtmlRenderer>,
    product_id: &str,
    flavor: Option<&str>,
    delta: i64,
) {
    let key = line_key(session, product_id, flavor);
    session.adjust_quantity(&key, delta).await;
    show(session);
}

/// Remove everything.
pub async fn clear(session: &mut Session<HtmlRenderer>) {
    session.clear_cart().await;
    show(session);
}

/// Key of the line the user means.
///
/// Without a flavor, the first line for the product is used, so products with
/// a single line in the cart do not need `--flavor`.
fn line_key(
    session: &Session<HtmlRenderer>,
    product_id: &str,
    flavor: Option<&str>,
) -> CartLineKey {
    let product_id = ProductId::new(product_id);
    if flavor.is_some() {
        return CartLineKey::new(product_id, flavor);
    }
    session
        .cart()
        .lines()
        .iter()
        .find(|line| line.key.product_id == product_id)
        .map_or_else(|| CartLineKey::new(product_id.clone(), None), |line| line.key.clone())
}
