use serde::{Deserialize, Serialize};

use crate::engine::Mirror;
use crate::model::round_cents;
use crate::Product;

/// A line in the cart. `price` is the discounted unit price at the time the
/// product was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.discounted_price(),
            thumbnail: product.thumbnail.clone(),
            quantity,
            discount_percentage: product.discount_percentage,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds the item, merging its quantity into an existing line with the same id.
    Add(CartItem),
    Remove(u64),
    Increase(u64),
    /// Decrements by one, removing the line when it reaches zero.
    Decrease(u64),
    Clear,
}

/// The cart ledger. Totals are always derived from the lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartState {
    #[serde(rename = "cartItems")]
    pub items: Vec<CartItem>,
}

impl CartState {
    pub const STORAGE_KEY: &'static str = "cartItems";

    /// Restores the persisted ledger, dropping lines that break the
    /// one-line-per-id or non-zero quantity invariants.
    pub fn rehydrate(mirror: &Mirror) -> Self {
        let stored: Vec<CartItem> = mirror.load(Self::STORAGE_KEY, Vec::new());
        let mut state = Self::default();
        for item in stored {
            state.apply(&CartAction::Add(item));
        }
        state
    }

    pub fn apply(&mut self, action: &CartAction) {
        match action {
            CartAction::Add(item) => {
                if item.quantity == 0 {
                    return;
                }
                match self.items.iter_mut().find(|i| i.id == item.id) {
                    Some(existing) => {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                    None => self.items.push(item.clone()),
                }
            }
            CartAction::Remove(id) => self.items.retain(|i| i.id != *id),
            CartAction::Increase(id) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id == *id) {
                    item.quantity = item.quantity.saturating_add(1);
                }
            }
            CartAction::Decrease(id) => {
                if let Some(pos) = self.items.iter().position(|i| i.id == *id) {
                    if self.items[pos].quantity > 1 {
                        self.items[pos].quantity -= 1;
                    } else {
                        self.items.remove(pos);
                    }
                }
            }
            CartAction::Clear => self.items.clear(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity over all lines, rounded to cents.
    pub fn total(&self) -> f64 {
        round_cents(self.items.iter().map(CartItem::line_total).sum())
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
