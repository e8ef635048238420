use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A catalog product. Read-only once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    /// Unit price after the discount, rounded to cents.
    pub fn discounted_price(&self) -> f64 {
        let discount = self.discount_percentage.unwrap_or(0.0).clamp(0.0, 100.0);
        round_cents(self.price * (100.0 - discount) / 100.0)
    }
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A structured postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Address {
    /// Single-line rendering, skipping missing parts.
    pub fn line(&self) -> String {
        [&self.road, &self.city, &self.state, &self.postcode, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Wire shape of a catalog record. Every field is optional; [`Product`] is
/// only built once the required ones are present and numeric fields coerce.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProduct {
    id: Option<Value>,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price: Option<Value>,
    discount_percentage: Option<Value>,
    rating: Option<Value>,
    stock: Option<Value>,
    thumbnail: Option<String>,
    images: Option<Vec<String>>,
    brand: Option<String>,
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

impl TryFrom<WireProduct> for Product {
    type Error = String;

    fn try_from(wire: WireProduct) -> std::result::Result<Self, Self::Error> {
        let id = wire
            .id
            .as_ref()
            .and_then(number)
            .filter(|id| *id >= 0.0 && id.fract() == 0.0)
            .ok_or("missing or invalid id")? as u64;
        let title = wire.title.filter(|t| !t.is_empty()).ok_or("missing title")?;
        let price = wire
            .price
            .as_ref()
            .and_then(number)
            .filter(|p| *p >= 0.0)
            .ok_or("missing or invalid price")?;

        Ok(Product {
            id,
            title,
            description: wire.description.unwrap_or_default(),
            category: wire.category.unwrap_or_default(),
            price,
            discount_percentage: wire
                .discount_percentage
                .as_ref()
                .and_then(number)
                .map(|d| d.clamp(0.0, 100.0)),
            rating: wire.rating.as_ref().and_then(number),
            stock: wire
                .stock
                .as_ref()
                .and_then(number)
                .map(|s| s.max(0.0).min(f64::from(u32::MAX)) as u32),
            thumbnail: wire.thumbnail.unwrap_or_default(),
            images: wire.images.unwrap_or_default(),
            brand: wire.brand.filter(|b| !b.is_empty()),
        })
    }
}

/// Parses a single catalog record.
pub fn parse_product(value: &Value) -> Result<Product> {
    let wire: WireProduct = serde_json::from_value(value.clone())?;
    Product::try_from(wire).map_err(Error::Catalog)
}

/// Parses a catalog page of the form `{ "products": [...] }`.
///
/// Records that fail validation are skipped with a warning rather than
/// failing the whole page.
pub fn parse_catalog(document: &Value) -> Result<Vec<Product>> {
    let records = document
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Catalog("response has no products array".to_string()))?;

    let mut products = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match parse_product(record) {
            Ok(p) => products.push(p),
            Err(e) => warn!("Skipping catalog record {}: {}", index, e),
        }
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_catalog_coerces_and_skips() {
        let doc = json!({
            "products": [
                {"id": 1, "title": "Phone", "price": 549, "discountPercentage": "12.96", "stock": 94,
                 "category": "smartphones", "brand": "Apple", "images": ["a.jpg"]},
                {"id": "2", "title": "Laptop", "price": "1249.5"},
                {"title": "No id", "price": 10},
                {"id": 4, "title": "Negative", "price": -1},
                {"id": 5, "price": 3}
            ]
        });

        let products = parse_catalog(&doc).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].discount_percentage, Some(12.96));
        assert_eq!(products[0].brand.as_deref(), Some("Apple"));
        assert_eq!(products[1].id, 2);
        assert_eq!(products[1].price, 1249.5);
        assert_eq!(products[1].category, "");
    }

    #[test]
    fn test_parse_catalog_without_products_array() {
        let res = parse_catalog(&json!({"items": []}));
        assert!(matches!(res, Err(Error::Catalog(_))));
    }

    #[test]
    fn test_discounted_price() {
        let p = parse_product(&json!({"id": 1, "title": "Mascara", "price": 9.99, "discountPercentage": 10})).unwrap();
        assert_eq!(p.discounted_price(), 8.99);

        let full = parse_product(&json!({"id": 2, "title": "Plain", "price": 20})).unwrap();
        assert_eq!(full.discounted_price(), 20.0);
    }

    #[test]
    fn test_address_line() {
        let addr = Address {
            road: Some("Main St".to_string()),
            city: Some("Springfield".to_string()),
            country: Some("US".to_string()),
            ..Default::default()
        };
        assert_eq!(addr.line(), "Main St, Springfield, US");
    }
}
