//! Askama-backed HTML renderer.

use askama::Template;

use super::{CartView, FilterOptionsView, ProductCardView, Renderer};
use crate::cart::Cart;

/// What the product grid area currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GridState {
    /// Nothing rendered yet.
    #[default]
    Loading,
    Products(Vec<ProductCardView>),
    /// Filters matched nothing.
    Empty,
    /// The catalog could not be fetched.
    Unavailable(String),
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    store_name: &'a str,
    cards: &'a [ProductCardView],
    loading: bool,
    empty: bool,
    error: Option<&'a str>,
    filters: &'a FilterOptionsView,
    cart: &'a CartView,
    show_toast: bool,
    age_gate: bool,
}

/// Keeps the latest view state and renders it as a complete HTML page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    store_name: String,
    grid: GridState,
    filters: FilterOptionsView,
    cart: CartView,
    toast: bool,
    age_gate: bool,
}

impl HtmlRenderer {
    /// Create a renderer with an empty grid and cart.
    #[must_use]
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            grid: GridState::Loading,
            filters: FilterOptionsView::default(),
            cart: CartView::from(&Cart::new()),
            toast: false,
            age_gate: false,
        }
    }

    /// Current grid state.
    #[must_use]
    pub const fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Last rendered filter options.
    #[must_use]
    pub const fn filters(&self) -> &FilterOptionsView {
        &self.filters
    }

    /// Last rendered cart.
    #[must_use]
    pub const fn cart(&self) -> &CartView {
        &self.cart
    }

    /// Whether the add-to-cart toast is showing.
    #[must_use]
    pub const fn toast_visible(&self) -> bool {
        self.toast
    }

    /// Whether the age gate is showing.
    #[must_use]
    pub const fn age_gate_visible(&self) -> bool {
        self.age_gate
    }

    /// Render the whole page.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if template rendering fails.
    pub fn render_page(&self) -> askama::Result<String> {
        let cards = match &self.grid {
            GridState::Products(cards) => cards.as_slice(),
            _ => &[],
        };
        let error = match &self.grid {
            GridState::Unavailable(message) => Some(message.as_str()),
            _ => None,
        };

        PageTemplate {
            store_name: &self.store_name,
            cards,
            loading: matches!(self.grid, GridState::Loading),
            empty: matches!(self.grid, GridState::Empty),
            error,
            filters: &self.filters,
            cart: &self.cart,
            show_toast: self.toast,
            age_gate: self.age_gate,
        }
        .render()
    }
}

impl Renderer for HtmlRenderer {
    fn render_products(&mut self, cards: &[ProductCardView]) {
        self.grid = GridState::Products(cards.to_vec());
    }

    fn render_empty(&mut self) {
        self.grid = GridState::Empty;
    }

    fn render_catalog_unavailable(&mut self, message: &str) {
        self.grid = GridState::Unavailable(message.to_string());
    }

    fn render_filter_options(&mut self, options: &FilterOptionsView) {
        self.filters = options.clone();
    }

    fn render_cart(&mut self, cart: &CartView) {
        self.cart = cart.clone();
    }

    fn show_added_toast(&mut self) {
        self.toast = true;
    }

    fn render_age_gate(&mut self, visible: bool) {
        self.age_gate = visible;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};
    use crate::filter::FilterSpec;
    use crate::render::{CATALOG_ERROR_MESSAGE, EMPTY_CART_MESSAGE};
    use jvapes_core::{Discount, Kes, ProductId, PuffCount};

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Elf Bar BC5000".to_string(),
            brand: "Elf Bar".to_string(),
            puff_count: PuffCount::new(5000),
            nicotine: Some("5%".to_string()),
            flavors: vec!["Mango Ice".to_string(), "Blue Razz".to_string()],
            price: Kes::new(2000),
            discount: Discount::new(20).unwrap(),
            image_url: Some("https://cdn.sanity.io/images/x/production/a.png".to_string()),
        }
    }

    #[test]
    fn test_page_with_products_and_cart() {
        let p = product();
        let mut renderer = HtmlRenderer::new("J_VAPES.KE");
        renderer.render_products(&[ProductCardView::from(&p)]);
        renderer.render_filter_options(&FilterOptionsView::new(
            &Catalog::new(vec![p.clone()]),
            &FilterSpec::default(),
        ));
        renderer.render_cart(&CartView::from(&Cart::new().add_item(&p, Some("Mango Ice"))));
        renderer.show_added_toast();

        let html = renderer.render_page().unwrap();
        assert!(html.contains("Elf Bar BC5000"));
        assert!(html.contains("-20%"));
        assert!(html.contains("KES 1,600"));
        assert!(html.contains("KES 2,000"));
        assert!(html.contains("5000 Puffs"));
        assert!(html.contains(r#"<option value="Blue Razz">Blue Razz</option>"#));
        assert!(html.contains(r#"<option value="Elf Bar">Elf Bar</option>"#));
        assert!(html.contains("Flavor: Mango Ice"));
        assert!(html.contains(r#"id="toast""#));
        assert!(!html.contains(EMPTY_CART_MESSAGE));
        assert!(!html.contains(r#"id="age-gate""#));
    }

    #[test]
    fn test_page_empty_states() {
        let mut renderer = HtmlRenderer::new("J_VAPES.KE");
        renderer.render_empty();
        renderer.render_age_gate(true);
        let html = renderer.render_page().unwrap();
        assert!(html.contains(r#"id="empty-state""#));
        assert!(html.contains(EMPTY_CART_MESSAGE));
        assert!(html.contains(r#"id="age-gate""#));
        assert!(!html.contains(r#"id="cart-count""#));
    }

    #[test]
    fn test_page_catalog_error() {
        let mut renderer = HtmlRenderer::new("J_VAPES.KE");
        renderer.render_catalog_unavailable(CATALOG_ERROR_MESSAGE);
        assert_eq!(
            renderer.grid(),
            &GridState::Unavailable(CATALOG_ERROR_MESSAGE.to_string())
        );
        let html = renderer.render_page().unwrap();
        assert!(html.contains(CATALOG_ERROR_MESSAGE));
        assert!(!html.contains(r#"id="empty-state""#));
    }

    #[test]
    fn test_page_escapes_catalog_text() {
        let mut p = product();
        p.name = "<script>alert(1)</script>".to_string();
        let mut renderer = HtmlRenderer::new("J_VAPES.KE");
        renderer.render_products(&[ProductCardView::from(&p)]);
        let html = renderer.render_page().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&#60;script&#62;") || html.contains("&lt;script&gt;"));
    }
}
