use log::info;
use serde::Serialize;

use crate::model::round_cents;
use crate::slices::{CartAction, CartState};
use crate::store::Store;
use crate::{Address, Error, Geocoder, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: f64,
    /// Amount saved against undiscounted prices.
    pub savings: f64,
    pub item_count: u32,
    pub line_count: usize,
}

impl CheckoutSummary {
    pub fn from_cart(cart: &CartState) -> Result<Self> {
        if cart.is_empty() {
            return Err(Error::EmptyCart);
        }
        let savings: f64 = cart
            .items
            .iter()
            .filter_map(|item| {
                let discount = item.discount_percentage?;
                if !(0.0..100.0).contains(&discount) {
                    return None;
                }
                let original = item.price * 100.0 / (100.0 - discount);
                Some((original - item.price) * f64::from(item.quantity))
            })
            .sum();

        Ok(Self {
            subtotal: cart.total(),
            savings: round_cents(savings),
            item_count: cart.item_count(),
            line_count: cart.items.len(),
        })
    }
}

/// Resolves the shipping address for a device location.
pub async fn locate_shipping_address(geocoder: &dyn Geocoder, lat: f64, lon: f64) -> Result<Address> {
    let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
    if !valid {
        return Err(Error::InvalidCoordinates { lat, lon });
    }
    geocoder.reverse(lat, lon).await
}

/// Places the order for the current cart and clears it. No payment is taken.
pub fn place_order(store: &Store) -> Result<CheckoutSummary> {
    let summary = store.select(|s| CheckoutSummary::from_cart(&s.cart))?;
    store.dispatch(CartAction::Clear);
    info!(
        "Order placed: {} items, subtotal {:.2}",
        summary.item_count, summary.subtotal
    );
    Ok(summary)
}
