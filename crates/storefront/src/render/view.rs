//! View state handed to renderers.
//!
//! Everything here is display-ready: prices are already formatted and image
//! URLs already sized, so a renderer only has to lay things out.

use jvapes_core::PuffCount;
use serde::Serialize;

use crate::cart::{Cart, CartLine};
use crate::catalog::{Catalog, Product};
use crate::filter::{ALL, FilterSpec, PriceBucket};

/// Label shown on cards for products without a flavor choice.
pub const STANDARD_FLAVOR_LABEL: &str = "Standard Flavor";

/// Shown in the cart drawer when there is nothing in it.
pub const EMPTY_CART_MESSAGE: &str = "Your bag is empty";

/// Shown in place of the grid when the catalog could not be loaded.
pub const CATALOG_ERROR_MESSAGE: &str = "Error loading products.";

/// One product card in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub brand: String,
    /// e.g. "5000 Puffs".
    pub puffs: String,
    pub nicotine: Option<String>,
    pub image_url: String,
    /// Discounted price, e.g. "KES 1,600".
    pub price: String,
    /// Struck-through base price, only when on sale.
    pub original_price: Option<String>,
    /// e.g. "-20%", only when on sale.
    pub sale_badge: Option<String>,
    /// Flavor picker options; the first one is preselected.
    pub flavors: Vec<String>,
}

impl ProductCardView {
    /// Whether the card shows the "Standard Flavor" label instead of a picker.
    #[must_use]
    pub fn has_standard_flavor(&self) -> bool {
        self.flavors.is_empty()
    }
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let on_sale = product.is_on_sale();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            puffs: puff_label(product.puff_count),
            nicotine: product.nicotine.clone(),
            image_url: product.grid_image_url(),
            price: product.final_price().to_string(),
            original_price: on_sale.then(|| product.price.to_string()),
            sale_badge: on_sale.then(|| format!("-{}", product.discount)),
            flavors: product.flavors.clone(),
        }
    }
}

/// Build card views for the visible products, in order.
#[must_use]
pub fn product_cards(products: &[&Product]) -> Vec<ProductCardView> {
    products.iter().map(|p| ProductCardView::from(*p)).collect()
}

fn puff_label(puffs: PuffCount) -> String {
    format!("{puffs} Puffs")
}

/// A dropdown option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        let selected = value == current;
        Self {
            value,
            label: label.into(),
            selected,
        }
    }
}

/// Search box and dropdown contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptionsView {
    pub search: String,
    pub brands: Vec<FilterOption>,
    pub puffs: Vec<FilterOption>,
    pub prices: Vec<FilterOption>,
}

impl FilterOptionsView {
    /// Options derived from the catalog, with the current selections marked.
    ///
    /// Brands are sorted alphabetically and puff counts numerically; each list
    /// starts with its "all" entry.
    #[must_use]
    pub fn new(catalog: &Catalog, spec: &FilterSpec) -> Self {
        let brand = spec.brand.to_string();
        let puffs = spec.puffs.to_string();
        let price = spec.price.as_str();

        let brands = std::iter::once(FilterOption::new(ALL, "Brand: All", &brand))
            .chain(
                catalog
                    .brands()
                    .into_iter()
                    .map(|b| FilterOption::new(b, b, &brand)),
            )
            .collect();

        let puffs = std::iter::once(FilterOption::new(ALL, "Puffs: All", &puffs))
            .chain(
                catalog
                    .puff_counts()
                    .into_iter()
                    .map(|p| FilterOption::new(p.to_string(), puff_label(p), &puffs)),
            )
            .collect();

        let prices = [
            (PriceBucket::All, "Price: All"),
            (PriceBucket::Low, "Under KES 1,500"),
            (PriceBucket::Mid, "KES 1,500 - 2,500"),
            (PriceBucket::High, "Over KES 2,500"),
            (PriceBucket::Sale, "On Sale"),
        ]
        .into_iter()
        .map(|(bucket, label)| FilterOption::new(bucket.as_str(), label, price))
        .collect();

        Self {
            search: spec.search.clone(),
            brands,
            puffs,
            prices,
        }
    }
}

/// One row in the cart drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    /// Stable line identifier, `<product id>-<flavor>`.
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub flavor: String,
    pub quantity: u32,
    pub image: String,
    /// Quantity times unit price, e.g. "KES 3,200".
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            line_id: line.key.to_string(),
            product_id: line.key.product_id.to_string(),
            name: line.name.clone(),
            brand: line.brand.clone(),
            flavor: line.flavor().to_string(),
            quantity: line.quantity,
            image: line.image.clone(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// The cart drawer and header badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_quantity: u64,
    /// e.g. "KES 4,150".
    pub total: String,
}

impl CartView {
    /// Badge text, hidden when the cart is empty.
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        (self.total_quantity > 0).then(|| self.total_quantity.to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total_quantity: totals.total_quantity,
            total: totals.total_price.to_string(),
        }
    }
}
