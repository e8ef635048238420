use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    TitleAsc,
}

/// Filters applied on top of the product list. Prices compare against the
/// discounted price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortOrder,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.discounted_price();
        self.category
            .as_deref()
            .map_or(true, |c| product.category.eq_ignore_ascii_case(c))
            && self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

/// Filters and sorts `products`. Sorting is stable, so ties keep catalog order.
pub fn apply<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let mut result: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    match query.sort {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => result.sort_by(|a, b| by_price(a, b)),
        SortOrder::PriceDesc => result.sort_by(|a, b| by_price(b, a)),
        SortOrder::RatingDesc => result.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .partial_cmp(&a.rating.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        }),
        SortOrder::TitleAsc => result.sort_by_key(|p| p.title.to_lowercase()),
    }
    result
}

fn by_price(a: &Product, b: &Product) -> Ordering {
    a.discounted_price()
        .partial_cmp(&b.discounted_price())
        .unwrap_or(Ordering::Equal)
}

/// Distinct categories with their product counts, by name. Uncategorized
/// products are not counted.
pub fn categories(products: &[Product]) -> Vec<CategoryFacet> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for product in products.iter().filter(|p| !p.category.is_empty()) {
        *counts.entry(product.category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| CategoryFacet {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// The first `limit` items.
pub fn page<T>(items: &[T], limit: usize) -> &[T] {
    &items[..limit.min(items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products() -> Vec<Product> {
        [
            json!({"id": 1, "title": "Red Lipstick", "price": 12.0, "category": "beauty", "rating": 4.1}),
            json!({"id": 2, "title": "Apple", "price": 2.0, "category": "groceries", "rating": 4.8}),
            json!({"id": 3, "title": "Bed", "price": 1000.0, "discountPercentage": 50, "category": "furniture"}),
            json!({"id": 4, "title": "Mascara", "price": 9.0, "category": "beauty", "rating": 2.5}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    fn ids(list: &[&Product]) -> Vec<u64> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_category_filter_and_sort() {
        let all = products();
        let query = ProductQuery {
            category: Some("Beauty".to_string()),
            sort: SortOrder::PriceAsc,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&all, &query)), vec![4, 1]);
    }

    #[test]
    fn test_price_range_uses_discounted_price() {
        let all = products();
        let query = ProductQuery {
            min_price: Some(400.0),
            max_price: Some(600.0),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&all, &query)), vec![3]);
    }

    #[test]
    fn test_sort_orders() {
        let all = products();
        let sorted = |sort| ids(&apply(&all, &ProductQuery { sort, ..Default::default() }));

        assert_eq!(sorted(SortOrder::Relevance), vec![1, 2, 3, 4]);
        assert_eq!(sorted(SortOrder::PriceDesc), vec![3, 1, 4, 2]);
        assert_eq!(sorted(SortOrder::RatingDesc), vec![2, 1, 4, 3]);
        assert_eq!(sorted(SortOrder::TitleAsc), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_category_facets() {
        let facets = categories(&products());
        assert_eq!(
            facets,
            vec![
                CategoryFacet { name: "beauty".to_string(), count: 2 },
                CategoryFacet { name: "furniture".to_string(), count: 1 },
                CategoryFacet { name: "groceries".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_page() {
        let all = products();
        assert_eq!(page(&all, 2).len(), 2);
        assert_eq!(page(&all, 50).len(), 4);
    }
}
