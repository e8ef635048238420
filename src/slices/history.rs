use serde::Serialize;

use crate::engine::Mirror;
use crate::Product;

/// Number of recently viewed products kept.
pub const MAX_VIEWED: usize = 20;

#[derive(Debug, Clone)]
pub enum HistoryAction {
    /// Moves the product to the front, evicting the oldest entry past the bound.
    Add(Product),
    Remove(u64),
    Clear,
}

/// Recently viewed products, most recent first, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub viewed_products: Vec<Product>,
}

impl HistoryState {
    pub const STORAGE_KEY: &'static str = "viewedProducts";

    pub fn rehydrate(mirror: &Mirror) -> Self {
        let mut stored: Vec<Product> = mirror.load(Self::STORAGE_KEY, Vec::new());
        let mut seen = std::collections::HashSet::new();
        stored.retain(|p| seen.insert(p.id));
        stored.truncate(MAX_VIEWED);
        Self { viewed_products: stored }
    }

    pub fn apply(&mut self, action: &HistoryAction) {
        match action {
            HistoryAction::Add(product) => {
                self.viewed_products.retain(|p| p.id != product.id);
                self.viewed_products.insert(0, product.clone());
                self.viewed_products.truncate(MAX_VIEWED);
            }
            HistoryAction::Remove(id) => self.viewed_products.retain(|p| p.id != *id),
            HistoryAction::Clear => self.viewed_products.clear(),
        }
    }

    pub fn ids(&self) -> Vec<u64> {
        self.viewed_products.iter().map(|p| p.id).collect()
    }
}
