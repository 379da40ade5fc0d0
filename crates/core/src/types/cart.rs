//! Cart line snapshots and deferred verification credits.
//!
//! Both shapes are persisted as client-local JSON blobs, so their wire
//! format is part of the contract even though they never reach the remote
//! store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One cart line: a product snapshot plus a quantity.
///
/// Price and discount are captured at add time and are not re-fetched on
/// later reads; `Cart::refresh` re-resolves them against a live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub price: Decimal,
    #[serde(default, rename = "discount")]
    pub discount_percent: u8,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot a product into a new line with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            discount_percent: product.discount_percent,
            quantity: 1,
        }
    }

    /// Re-capture price, discount, and name from a live catalog record.
    pub fn resync(&mut self, product: &Product) {
        self.name = product.name.clone();
        self.price = product.price;
        self.discount_percent = product.discount_percent;
    }
}

/// A verification award recorded while no user was signed in.
///
/// Claimed after the user authenticates; the claim flow lives outside the
/// core, but the record shape is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCredit {
    pub product_id: ProductId,
    pub points: u64,
    pub recorded_at: DateTime<Utc>,
}

impl PendingCredit {
    /// Record a deferred award stamped with the current time.
    #[must_use]
    pub fn new(product_id: ProductId, points: u64) -> Self {
        Self {
            product_id,
            points,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::types::product::Product;

    use super::*;

    #[test]
    fn test_from_product_snapshots_price_and_discount() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p-1","name":"Amber Oud","price":"100","discount":20}"#)
                .unwrap();
        let line = CartLine::from_product(&product);
        assert_eq!(line.product_id, ProductId::new("p-1"));
        assert_eq!(line.price, dec!(100));
        assert_eq!(line.discount_percent, 20);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_resync_overwrites_snapshot() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p-1","name":"Amber Oud","price":"100"}"#).unwrap();
        let mut line = CartLine::from_product(&product);

        let fresh: Product =
            serde_json::from_str(r#"{"id":"p-1","name":"Amber Oud","price":"80","discount":5}"#)
                .unwrap();
        line.resync(&fresh);
        assert_eq!(line.price, dec!(80));
        assert_eq!(line.discount_percent, 5);
    }
}
