//! Cart reducer.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s with at most one line per
//! [`CartLineKey`] (product + flavor). Every operation consumes the cart and
//! returns the next one; totals are recomputed from the lines on demand.
//!
//! Unit prices are captured when a line is created and never recomputed, so a
//! later catalog discount change does not reprice what is already in the bag.

use std::fmt;

use jvapes_core::{Kes, ProductId};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Flavor recorded for products that have no flavor choice.
pub const DEFAULT_FLAVOR: &str = "Default";

/// Identity of a cart line: one product in one flavor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartLineKey {
    pub product_id: ProductId,
    pub flavor: String,
}

impl CartLineKey {
    /// Build a key, using [`DEFAULT_FLAVOR`] when no flavor was selected.
    #[must_use]
    pub fn new(product_id: ProductId, flavor: Option<&str>) -> Self {
        Self {
            product_id,
            flavor: flavor.unwrap_or(DEFAULT_FLAVOR).to_string(),
        }
    }
}

impl fmt::Display for CartLineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.product_id, self.flavor)
    }
}

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub key: CartLineKey,
    pub name: String,
    pub brand: String,
    /// Discounted price captured when the line was created.
    pub unit_price: Kes,
    /// Always at least 1.
    pub quantity: u32,
    /// Thumbnail URL captured when the line was created.
    pub image: String,
}

impl CartLine {
    fn from_product(product: &Product, key: CartLineKey) -> Self {
        Self {
            key,
            name: product.name.clone(),
            brand: product.brand.clone(),
            unit_price: product.final_price(),
            quantity: 1,
            image: product.thumbnail_url(),
        }
    }

    /// The selected flavor.
    #[must_use]
    pub fn flavor(&self) -> &str {
        &self.key.flavor
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Kes {
        self.unit_price.times(self.quantity)
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub total_quantity: u64,
    pub total_price: Kes,
}

/// The shopping cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<StoredCartLine>", from = "Vec<StoredCartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not items).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, key: &CartLineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Add one unit of `product` in `flavor`.
    ///
    /// An existing line for the same product and flavor is incremented;
    /// otherwise a new line is appended at the current discounted price.
    #[must_use]
    pub fn add_item(mut self, product: &Product, flavor: Option<&str>) -> Self {
        let key = CartLineKey::new(product.id.clone(), flavor);
        match self.lines.iter_mut().find(|line| line.key == key) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_product(product, key)),
        }
        self
    }

    /// Drop a line whatever its quantity. Unknown keys are ignored.
    #[must_use]
    pub fn remove_line(mut self, key: &CartLineKey) -> Self {
        self.lines.retain(|line| &line.key != key);
        self
    }

    /// Change a line's quantity by `delta`, removing it at zero or below.
    /// Unknown keys are ignored.
    #[must_use]
    pub fn adjust_quantity(mut self, key: &CartLineKey, delta: i64) -> Self {
        let Some(index) = self.lines.iter().position(|line| &line.key == key) else {
            return self;
        };

        let current = self.lines.get(index).map_or(0, |line| i64::from(line.quantity));
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        self
    }

    /// Total item count and total price.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_quantity: self.lines.iter().map(|line| u64::from(line.quantity)).sum(),
            total_price: self.lines.iter().map(CartLine::line_total).sum(),
        }
    }

    /// Build a cart from lines that may violate the cart invariants.
    ///
    /// Lines with a zero quantity are dropped and lines sharing a key are
    /// merged into the first one.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|line| line.quantity > 0) {
            match cart.lines.iter_mut().find(|existing| existing.key == line.key) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }
}

// =============================================================================
// Storage Format
// =============================================================================

/// A cart line as stored in local storage.
///
/// Field names match the records written by earlier versions of the widget,
/// so carts saved before an upgrade still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCartLine {
    #[serde(default, skip_deserializing)]
    cart_id: String,
    product_id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default = "default_flavor")]
    flavor: String,
    price: Kes,
    qty: i64,
    #[serde(default)]
    image: String,
}

fn default_flavor() -> String {
    DEFAULT_FLAVOR.to_string()
}

impl From<CartLine> for StoredCartLine {
    fn from(line: CartLine) -> Self {
        Self {
            cart_id: line.key.to_string(),
            product_id: line.key.product_id,
            name: line.name,
            brand: line.brand,
            flavor: line.key.flavor,
            price: line.unit_price,
            qty: i64::from(line.quantity),
            image: line.image,
        }
    }
}

impl From<Cart> for Vec<StoredCartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines.into_iter().map(StoredCartLine::from).collect()
    }
}

impl From<Vec<StoredCartLine>> for Cart {
    fn from(stored: Vec<StoredCartLine>) -> Self {
        Self::from_lines(stored.into_iter().filter(|s| s.qty > 0).map(|s| CartLine {
            key: CartLineKey {
                product_id: s.product_id,
                flavor: s.flavor,
            },
            name: s.name,
            brand: s.brand,
            unit_price: s.price,
            quantity: u32::try_from(s.qty).unwrap_or(u32::MAX),
            image: s.image,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jvapes_core::{Discount, PuffCount};
    use serde_json::json;

    fn product_a() -> Product {
        Product {
            id: ProductId::new("A"),
            name: "Elf Bar BC5000".to_string(),
            brand: "Elf Bar".to_string(),
            puff_count: PuffCount::new(5000),
            nicotine: Some("5%".to_string()),
            flavors: vec!["Mint".to_string(), "Mango Ice".to_string()],
            price: Kes::new(2000),
            discount: Discount::new(20).unwrap(),
            image_url: None,
        }
    }

    fn product_b() -> Product {
        Product {
            id: ProductId::new("B"),
            name: "Geek Bar".to_string(),
            brand: "Geek Bar".to_string(),
            puff_count: PuffCount::new(600),
            nicotine: None,
            flavors: Vec::new(),
            price: Kes::new(950),
            discount: Discount::NONE,
            image_url: None,
        }
    }

    fn key(id: &str, flavor: &str) -> CartLineKey {
        CartLineKey::new(ProductId::new(id), Some(flavor))
    }

    #[test]
    fn test_add_item_to_empty_cart() {
        let cart = Cart::new().add_item(&product_a(), Some("Mint"));

        assert_eq!(cart.len(), 1);
        let line = cart.get(&key("A", "Mint")).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Kes::new(1600));
        assert_eq!(line.name, "Elf Bar BC5000");
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_quantity: 1,
                total_price: Kes::new(1600)
            }
        );
    }

    #[test]
    fn test_add_same_item_twice_merges() {
        let a = product_a();
        let cart = Cart::new().add_item(&a, Some("Mint")).add_item(&a, Some("Mint"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&key("A", "Mint")).unwrap().quantity, 2);
    }

    #[test]
    fn test_different_flavors_are_separate_lines() {
        let a = product_a();
        let cart = Cart::new()
            .add_item(&a, Some("Mint"))
            .add_item(&a, Some("Mango Ice"));
        assert_eq!(cart.len(), 2);
        let flavors: Vec<_> = cart.lines().iter().map(CartLine::flavor).collect();
        assert_eq!(flavors, vec!["Mint", "Mango Ice"]);
    }

    #[test]
    fn test_no_flavor_uses_default_sentinel() {
        let cart = Cart::new().add_item(&product_b(), None);
        assert!(cart.get(&key("B", DEFAULT_FLAVOR)).is_some());
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut a = product_a();
        let cart = Cart::new().add_item(&a, Some("Mint"));
        a.discount = Discount::NONE;
        let cart = cart.add_item(&a, Some("Mint"));

        let line = cart.get(&key("A", "Mint")).unwrap();
        assert_eq!(line.unit_price, Kes::new(1600));
        assert_eq!(cart.totals().total_price, Kes::new(3200));
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let cart = Cart::new()
            .add_item(&product_a(), Some("Mint"))
            .add_item(&product_b(), None);
        let once = cart.remove_line(&key("A", "Mint"));
        let twice = once.clone().remove_line(&key("A", "Mint"));
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_adjust_quantity() {
        let k = key("A", "Mint");
        let cart = Cart::new()
            .add_item(&product_a(), Some("Mint"))
            .adjust_quantity(&k, 4);
        assert_eq!(cart.get(&k).unwrap().quantity, 5);

        let cart = cart.adjust_quantity(&k, -2);
        assert_eq!(cart.get(&k).unwrap().quantity, 3);
    }

    #[test]
    fn test_adjust_by_negative_quantity_removes_line() {
        let k = key("A", "Mint");
        let cart = Cart::new()
            .add_item(&product_a(), Some("Mint"))
            .add_item(&product_a(), Some("Mint"));
        let qty = i64::from(cart.get(&k).unwrap().quantity);
        let cart = cart.adjust_quantity(&k, -qty);
        assert!(cart.get(&k).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_unknown_key_is_noop() {
        let cart = Cart::new().add_item(&product_b(), None);
        let adjusted = cart.clone().adjust_quantity(&key("Z", "Mint"), 3);
        assert_eq!(cart, adjusted);
    }

    #[test]
    fn test_totals() {
        let cart = Cart::new()
            .add_item(&product_a(), Some("Mint"))
            .add_item(&product_a(), Some("Mint"))
            .add_item(&product_b(), None);
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_quantity: 3,
                total_price: Kes::new(1600 * 2 + 950)
            }
        );
        assert_eq!(Cart::new().totals(), CartTotals::default());
    }

    #[test]
    fn test_stored_format_field_names() {
        let cart = Cart::new().add_item(&product_a(), Some("Mint"));
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value,
            json!([{
                "cartId": "A-Mint",
                "productId": "A",
                "name": "Elf Bar BC5000",
                "brand": "Elf Bar",
                "flavor": "Mint",
                "price": 1600,
                "qty": 1,
                "image": "https://placehold.co/100x100"
            }])
        );
        let restored: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_rehydration_restores_invariants() {
        let stored = json!([
            {"productId": "A", "name": "A", "brand": "X", "flavor": "Mint", "price": 100, "qty": 1},
            {"productId": "B", "name": "B", "brand": "X", "price": 50, "qty": 0},
            {"productId": "A", "name": "A", "brand": "X", "flavor": "Mint", "price": 100, "qty": 2},
            {"productId": "C", "name": "C", "brand": "X", "price": 10, "qty": -4}
        ]);
        let cart: Cart = serde_json::from_value(stored).unwrap();
        assert_eq!(cart.len(), 1);
        let line = cart.get(&key("A", "Mint")).unwrap();
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_stored_line_without_flavor_gets_default() {
        let stored = json!([{"productId": "B", "price": 950, "qty": 1}]);
        let cart: Cart = serde_json::from_value(stored).unwrap();
        assert!(cart.get(&key("B", DEFAULT_FLAVOR)).is_some());
    }
}
