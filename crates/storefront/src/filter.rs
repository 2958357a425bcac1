//! Catalog filter engine.
//!
//! [`visible_products`] is pure and order-preserving: the result is the
//! catalog, in catalog order, minus every product that fails one of the active
//! predicates (search, brand, puff count, price bucket).

use std::fmt;
use std::str::FromStr;

use jvapes_core::{Kes, PuffCount};
use thiserror::Error;

use crate::catalog::Product;

/// Wildcard value used by every dropdown filter.
pub const ALL: &str = "all";

/// Discounted prices below this are "low".
pub const LOW_PRICE_CEILING: Kes = Kes::new(1500);

/// Discounted prices above this are "high".
pub const HIGH_PRICE_FLOOR: Kes = Kes::new(2500);

/// Error parsing a price bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price filter '{0}' (expected all, low, mid, high or sale)")]
pub struct UnknownPriceBucket(pub String);

/// A dropdown selection: everything, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    /// Build a selection from a dropdown value; `"all"` is the wildcard.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    /// Whether this is the wildcard.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Exact(value) => f.write_str(value),
        }
    }
}

/// Price band, evaluated on the discounted price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    #[default]
    All,
    /// Under KES 1,500.
    Low,
    /// KES 1,500 to 2,500 inclusive.
    Mid,
    /// Over KES 2,500.
    High,
    /// Any discounted product, whatever its price.
    Sale,
}

impl PriceBucket {
    /// Whether a product falls in this bucket.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        let price = product.final_price();
        match self {
            Self::All => true,
            Self::Low => price < LOW_PRICE_CEILING,
            Self::Mid => (LOW_PRICE_CEILING..=HIGH_PRICE_FLOOR).contains(&price),
            Self::High => price > HIGH_PRICE_FLOOR,
            Self::Sale => product.is_on_sale(),
        }
    }

    /// Dropdown value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
            Self::Sale => "sale",
        }
    }
}

impl FromStr for PriceBucket {
    type Err = UnknownPriceBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ALL => Ok(Self::All),
            "low" => Ok(Self::Low),
            "mid" => Ok(Self::Mid),
            "high" => Ok(Self::High),
            "sale" => Ok(Self::Sale),
            other => Err(UnknownPriceBucket(other.to_string())),
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current search and dropdown selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Free-text search. Empty matches everything.
    pub search: String,
    /// Exact, case-sensitive brand.
    pub brand: Selection,
    /// Puff count as selected in the UI (text).
    pub puffs: Selection,
    pub price: PriceBucket,
}

impl FilterSpec {
    /// Whether every criterion is the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.search.is_empty()
            && self.brand.is_all()
            && self.puffs.is_all()
            && self.price == PriceBucket::All
    }
}

/// Puff criterion normalized to the canonical numeric form, so any numeric
/// spelling of a count selects it.
enum PuffCriterion {
    Any,
    Exactly(PuffCount),
    /// A selection that is not a number; nothing equals it.
    Nothing,
}

impl PuffCriterion {
    fn from_selection(selection: &Selection) -> Self {
        match selection {
            Selection::All => Self::Any,
            Selection::Exact(text) => text.parse().map_or(Self::Nothing, Self::Exactly),
        }
    }

    fn matches(&self, puffs: PuffCount) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(wanted) => *wanted == puffs,
            Self::Nothing => false,
        }
    }
}

/// Case-insensitive search over name, brand, and flavors.
fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(needle)
        || product.brand.to_lowercase().contains(needle)
        || product
            .flavors
            .iter()
            .any(|f| f.to_lowercase().contains(needle))
}

fn matches_brand(product: &Product, brand: &Selection) -> bool {
    match brand {
        Selection::All => true,
        Selection::Exact(wanted) => product.brand == *wanted,
    }
}

/// Products that satisfy every active criterion, in catalog order.
#[must_use]
pub fn visible_products<'a>(catalog: &'a [Product], spec: &FilterSpec) -> Vec<&'a Product> {
    let needle = spec.search.to_lowercase();
    let puffs = PuffCriterion::from_selection(&spec.puffs);

    catalog
        .iter()
        .filter(|p| matches_search(p, &needle))
        .filter(|p| matches_brand(p, &spec.brand))
        .filter(|p| puffs.matches(p.puff_count))
        .filter(|p| spec.price.matches(p))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jvapes_core::{Discount, ProductId};

    fn product(id: &str, brand: &str, puffs: u32, price: u64, discount: u8) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("{brand} {puffs}"),
            brand: brand.to_string(),
            puff_count: PuffCount::new(puffs),
            nicotine: None,
            flavors: Vec::new(),
            price: Kes::new(price),
            discount: Discount::new(discount).unwrap(),
            image_url: None,
        }
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("a", "Elf Bar", 5000, 2000, 20),
            product("b", "Geek Bar", 15000, 3200, 0),
            product("c", "Elf Bar", 600, 900, 0),
            product("d", "Solo", 5000, 2600, 10),
        ]
    }

    #[test]
    fn test_wildcard_returns_full_catalog_in_order() {
        let catalog = catalog();
        let spec = FilterSpec::default();
        assert!(spec.is_wildcard());
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sale_bucket_ignores_price_band() {
        let catalog = vec![product("A", "X", 5000, 2000, 20)];
        let spec = FilterSpec {
            price: PriceBucket::Sale,
            ..FilterSpec::default()
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["A"]);
    }

    #[test]
    fn test_price_buckets_use_discounted_price() {
        let catalog = catalog();
        let bucket = |price| {
            let spec = FilterSpec {
                price,
                ..FilterSpec::default()
            };
            ids(&visible_products(&catalog, &spec))
        };
        // a: 1600, b: 3200, c: 900, d: 2340
        assert_eq!(bucket(PriceBucket::Low), vec!["c"]);
        assert_eq!(bucket(PriceBucket::Mid), vec!["a", "d"]);
        assert_eq!(bucket(PriceBucket::High), vec!["b"]);
        assert_eq!(bucket(PriceBucket::Sale), vec!["a", "d"]);
    }

    #[test]
    fn test_price_bucket_boundaries() {
        assert!(!PriceBucket::Low.matches(&product("x", "X", 1, 1500, 0)));
        assert!(PriceBucket::Mid.matches(&product("x", "X", 1, 1500, 0)));
        assert!(PriceBucket::Mid.matches(&product("x", "X", 1, 2500, 0)));
        assert!(!PriceBucket::High.matches(&product("x", "X", 1, 2500, 0)));
        assert!(PriceBucket::High.matches(&product("x", "X", 1, 2501, 0)));
    }

    #[test]
    fn test_search_matches_flavor() {
        let mut mango = product("m", "Brandless", 600, 1000, 0);
        mango.name = "Pod".to_string();
        mango.flavors = vec!["Mango Ice".to_string()];
        let catalog = vec![mango, product("n", "Other", 600, 1000, 0)];
        let spec = FilterSpec {
            search: "mango".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["m"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_brand() {
        let catalog = catalog();
        let spec = FilterSpec {
            search: "ELF".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "c"]);
    }

    #[test]
    fn test_brand_is_exact_and_case_sensitive() {
        let catalog = catalog();
        let mut spec = FilterSpec {
            brand: Selection::from_value("Elf Bar"),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "c"]);

        spec.brand = Selection::from_value("elf bar");
        assert!(visible_products(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_puff_selection_is_normalized() {
        let catalog = catalog();
        let mut spec = FilterSpec {
            puffs: Selection::from_value("5000"),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "d"]);

        spec.puffs = Selection::from_value(" 5000 ");
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "d"]);

        for spelling in ["05000", "5000.0", "5e3"] {
            spec.puffs = Selection::from_value(spelling);
            assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a", "d"]);
        }

        spec.puffs = Selection::from_value("5000 puffs");
        assert!(visible_products(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_criteria_are_combined() {
        let catalog = catalog();
        let spec = FilterSpec {
            search: "bar".to_string(),
            brand: Selection::from_value("Elf Bar"),
            puffs: Selection::from_value("5000"),
            price: PriceBucket::Sale,
        };
        assert_eq!(ids(&visible_products(&catalog, &spec)), vec!["a"]);
    }

    #[test]
    fn test_price_bucket_parsing() {
        assert_eq!("sale".parse::<PriceBucket>().unwrap(), PriceBucket::Sale);
        assert_eq!("all".parse::<PriceBucket>().unwrap(), PriceBucket::All);
        assert_eq!(
            "cheap".parse::<PriceBucket>().unwrap_err(),
            UnknownPriceBucket("cheap".to_string())
        );
    }
}
