//! Catalog product records and their conversion from raw API documents.

use jvapes_core::{Discount, Kes, ProductId, PuffCount, discounted_price};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Shown in the grid when a product has no image.
pub const GRID_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x400?text=No+Image";

/// Shown in the cart when a product has no image.
pub const THUMBNAIL_PLACEHOLDER_IMAGE: &str = "https://placehold.co/100x100";

const GRID_IMAGE_PARAMS: &[(&str, &str)] = &[
    ("w", "600"),
    ("h", "600"),
    ("fit", "crop"),
    ("auto", "format"),
    ("q", "80"),
];

const THUMBNAIL_IMAGE_PARAMS: &[(&str, &str)] =
    &[("w", "100"), ("h", "100"), ("fit", "crop"), ("auto", "format")];

/// Reasons a raw catalog document cannot become a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductRecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("price must be a positive whole number of shillings (got {0})")]
    InvalidPrice(String),
    #[error("discount must be a percentage between 0 and 100 (got {0})")]
    InvalidDiscount(String),
    #[error("invalid puff count: {0}")]
    InvalidPuffCount(String),
}

/// A product document exactly as the content API returns it.
///
/// Every field is optional here; [`Product::try_from`] decides what a usable
/// product needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub puff_count: Option<serde_json::Value>,
    pub nicotine: Option<String>,
    pub flavors: Option<Vec<String>>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub image_url: Option<String>,
}

/// A catalog product. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub puff_count: PuffCount,
    pub nicotine: Option<String>,
    /// Flavor names in display order. Empty for single-flavor products.
    pub flavors: Vec<String>,
    /// Base price before discount.
    pub price: Kes,
    pub discount: Discount,
    pub image_url: Option<String>,
}

impl Product {
    /// Price after the discount, as shown in the grid and frozen into the cart.
    #[must_use]
    pub fn final_price(&self) -> Kes {
        discounted_price(self.price, self.discount)
    }

    /// Whether the product carries a discount.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.discount.is_active()
    }

    /// Whether the product lists the given flavor.
    #[must_use]
    pub fn offers_flavor(&self, flavor: &str) -> bool {
        self.flavors.iter().any(|f| f == flavor)
    }

    /// The flavor preselected in the flavor picker, if the product has any.
    #[must_use]
    pub fn default_flavor(&self) -> Option<&str> {
        self.flavors.first().map(String::as_str)
    }

    /// Image URL sized for the product grid.
    #[must_use]
    pub fn grid_image_url(&self) -> String {
        sized_image_url(self.image_url.as_deref(), GRID_IMAGE_PARAMS)
            .unwrap_or_else(|| GRID_PLACEHOLDER_IMAGE.to_string())
    }

    /// Image URL sized for a cart thumbnail.
    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        sized_image_url(self.image_url.as_deref(), THUMBNAIL_IMAGE_PARAMS)
            .unwrap_or_else(|| THUMBNAIL_PLACEHOLDER_IMAGE.to_string())
    }
}

fn sized_image_url(image_url: Option<&str>, params: &[(&str, &str)]) -> Option<String> {
    let mut url = Url::parse(image_url?.trim()).ok()?;
    url.query_pairs_mut().extend_pairs(params.iter().copied());
    Some(url.into())
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductRecordError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = required_text(raw.id, "_id")?;
        let name = required_text(raw.name, "name")?;
        let brand = required_text(raw.brand, "brand")?;

        let puff_count = raw
            .puff_count
            .ok_or(ProductRecordError::MissingField("puffCount"))
            .and_then(|value| {
                serde_json::from_value::<PuffCount>(value)
                    .map_err(|e| ProductRecordError::InvalidPuffCount(e.to_string()))
            })?;

        let price = raw.price.ok_or(ProductRecordError::MissingField("price"))?;
        let price = whole_number(price)
            .and_then(|p| Kes::positive(p).ok())
            .ok_or_else(|| ProductRecordError::InvalidPrice(price.to_string()))?;

        let discount = match raw.discount {
            None => Discount::NONE,
            Some(d) => Discount::try_from(d)
                .map_err(|_| ProductRecordError::InvalidDiscount(d.to_string()))?,
        };

        let flavors = raw
            .flavors
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        Ok(Self {
            id: ProductId::new(id),
            name,
            brand,
            puff_count,
            nicotine: raw.nicotine.filter(|n| !n.trim().is_empty()),
            flavors,
            price,
            discount,
            image_url: raw.image_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ProductRecordError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ProductRecordError::MissingField(field))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)] // range and fraction are checked before the cast
fn whole_number(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < 9.0e15 {
        Some(value as u64)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawProduct {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "_id": "p1",
            "name": "Elf Bar BC5000",
            "brand": "Elf Bar",
            "puffCount": 5000,
            "nicotine": "5%",
            "flavors": ["Mango Ice", " Blue Razz ", ""],
            "price": 2000,
            "discount": 20,
            "imageUrl": "https://cdn.sanity.io/images/abc/production/img.png"
        })
    }

    #[test]
    fn test_converts_complete_record() {
        let product = Product::try_from(raw(complete())).unwrap();
        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.puff_count, PuffCount::new(5000));
        assert_eq!(product.flavors, vec!["Mango Ice", "Blue Razz"]);
        assert_eq!(product.price, Kes::new(2000));
        assert_eq!(product.final_price(), Kes::new(1600));
        assert!(product.is_on_sale());
        assert_eq!(product.default_flavor(), Some("Mango Ice"));
    }

    #[test]
    fn test_puff_count_as_text() {
        let mut value = complete();
        value["puffCount"] = json!("600");
        let product = Product::try_from(raw(value)).unwrap();
        assert_eq!(product.puff_count, PuffCount::new(600));
    }

    #[test]
    fn test_missing_discount_means_no_discount() {
        let mut value = complete();
        value["discount"] = serde_json::Value::Null;
        let product = Product::try_from(raw(value)).unwrap();
        assert_eq!(product.discount, Discount::NONE);
        assert_eq!(product.final_price(), Kes::new(2000));
    }

    #[test]
    fn test_fractional_discount_is_kept() {
        let mut value = complete();
        value["discount"] = json!(12.5);
        let product = Product::try_from(raw(value)).unwrap();
        assert!(product.is_on_sale());
        assert_eq!(product.discount.to_string(), "12.5%");
        assert_eq!(product.final_price(), Kes::new(1750));
    }

    #[test]
    fn test_rejects_invalid_records() {
        let mut value = complete();
        value["price"] = json!(0);
        assert!(matches!(
            Product::try_from(raw(value)),
            Err(ProductRecordError::InvalidPrice(_))
        ));

        let mut value = complete();
        value["discount"] = json!(120);
        assert!(matches!(
            Product::try_from(raw(value)),
            Err(ProductRecordError::InvalidDiscount(_))
        ));

        let mut value = complete();
        value["discount"] = json!(-0.5);
        assert!(matches!(
            Product::try_from(raw(value)),
            Err(ProductRecordError::InvalidDiscount(_))
        ));

        let mut value = complete();
        value["puffCount"] = json!("lots");
        assert!(matches!(
            Product::try_from(raw(value)),
            Err(ProductRecordError::InvalidPuffCount(_))
        ));

        let mut value = complete();
        value["name"] = json!("  ");
        assert_eq!(
            Product::try_from(raw(value)).unwrap_err(),
            ProductRecordError::MissingField("name")
        );
    }

    #[test]
    fn test_image_urls() {
        let product = Product::try_from(raw(complete())).unwrap();
        assert_eq!(
            product.grid_image_url(),
            "https://cdn.sanity.io/images/abc/production/img.png?w=600&h=600&fit=crop&auto=format&q=80"
        );
        assert_eq!(
            product.thumbnail_url(),
            "https://cdn.sanity.io/images/abc/production/img.png?w=100&h=100&fit=crop&auto=format"
        );
    }

    #[test]
    fn test_image_placeholders() {
        let mut value = complete();
        value["imageUrl"] = serde_json::Value::Null;
        let product = Product::try_from(raw(value)).unwrap();
        assert_eq!(product.grid_image_url(), GRID_PLACEHOLDER_IMAGE);
        assert_eq!(product.thumbnail_url(), THUMBNAIL_PLACEHOLDER_IMAGE);
    }
}
