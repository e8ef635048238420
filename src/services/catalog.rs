use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::info;

use crate::model::parse_catalog;
use crate::{CatalogSource, Error, Product, Result};

/// A catalog held in memory, typically loaded from a `{ "products": [...] }`
/// JSON document.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json(document: &serde_json::Value) -> Result<Self> {
        Ok(Self::new(parse_catalog(document)?))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let document: serde_json::Value = serde_json::from_slice(&content)
            .map_err(|e| Error::Catalog(format!("{:?}: {}", path, e)))?;
        let catalog = Self::from_json(&document)?;
        info!("Loaded {} products from {:?}", catalog.products.len(), path);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_products(&self, limit: usize) -> Result<Vec<Product>> {
        Ok(self.products.iter().take(limit).cloned().collect())
    }

    async fn fetch_product(&self, id: u64) -> Result<Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(Error::ProductNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn document() -> serde_json::Value {
        json!({"products": [
            {"id": 1, "title": "Essence Mascara", "price": 9.99, "category": "beauty"},
            {"id": 2, "title": "Eyeshadow Palette", "price": 19.99, "category": "beauty"},
            {"id": 3, "title": "Powder Canister", "price": 14.99, "category": "beauty"}
        ]})
    }

    #[tokio::test]
    async fn test_fetch_respects_limit() {
        let catalog = StaticCatalog::from_json(&document()).unwrap();
        assert_eq!(catalog.fetch_products(2).await.unwrap().len(), 2);
        assert_eq!(catalog.fetch_products(194).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_product_by_id() {
        let catalog = StaticCatalog::from_json(&document()).unwrap();
        assert_eq!(catalog.fetch_product(2).await.unwrap().title, "Eyeshadow Palette");
        assert!(matches!(catalog.fetch_product(9).await, Err(Error::ProductNotFound(9))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, document().to_string()).unwrap();
        assert_eq!(StaticCatalog::from_file(&path).unwrap().len(), 3);

        fs::write(&path, "<html>").unwrap();
        assert!(matches!(StaticCatalog::from_file(&path), Err(Error::Catalog(_))));
    }
}
