//! Quantity-keyed cart with write-through local persistence.
//!
//! The cart is local to one client and never synchronized across devices.
//! Every mutation is followed by a write-through to the local store so the
//! contents survive a restart. All operations are total: mutating an
//! unknown product id does nothing observable, and a failed local write is
//! logged and swallowed (matching a browser cart that ignores storage-quota
//! errors) rather than surfaced.
//!
//! Lines keep the price and discount captured when the product was added.
//! [`Cart::refresh`] re-resolves the snapshots against a live catalog for
//! callers that want current prices at checkout time.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use amberline_core::pricing::final_price;
use amberline_core::{CartLine, Product, ProductId};

use crate::local::{LocalStore, keys};

/// The shopping cart: at most one line per product id, quantity >= 1.
pub struct Cart {
    lines: Vec<CartLine>,
    local: Arc<dyn LocalStore>,
}

impl Cart {
    /// Load the persisted cart, or start empty if nothing usable is stored.
    #[must_use]
    pub fn load(local: Arc<dyn LocalStore>) -> Self {
        let lines = local
            .load::<Vec<CartLine>>(keys::CART)
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to read persisted cart, starting empty");
                None
            })
            .unwrap_or_default();
        Self { lines, local }
    }

    /// Add one unit of a product: bumps the existing line or appends a new one.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine::from_product(product));
        }
        self.persist();
    }

    /// Set a line's quantity; `0` removes the line. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if self.line_mut(id).is_none() {
            return;
        }
        if quantity == 0 {
            self.lines.retain(|l| &l.product_id != id);
        } else if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    /// Drop a line unconditionally. Unknown ids do nothing observable.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|l| &l.product_id != id);
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Re-capture price, discount, and name from a fresh catalog.
    ///
    /// Lines whose product no longer exists in the catalog are left on
    /// their stale snapshot; the order can still be composed from them.
    pub fn refresh(&mut self, catalog: &[Product]) {
        for line in &mut self.lines {
            if let Some(product) = catalog.iter().find(|p| p.id == line.product_id) {
                line.resync(product);
            }
        }
        self.persist();
    }

    /// Cart total, recomputed from the lines on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| final_price(l.price, l.discount_percent) * Decimal::from(l.quantity))
            .sum()
    }

    /// Total number of units across all lines (the cart-badge count).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == id)
    }

    fn persist(&self) {
        if let Err(e) = self.local.save(keys::CART, &self.lines) {
            warn!(error = %e, "failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::local::MemoryStore;

    use super::*;

    fn product(id: &str, price: Decimal, discount: u8) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "price": price,
            "discount": discount,
        }))
        .unwrap()
    }

    fn empty_cart() -> Cart {
        Cart::load(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_merges_lines_by_id() {
        let mut cart = empty_cart();
        let p = product("p-1", dec!(50), 0);
        cart.add(&p);
        cart.add(&p);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_total_applies_discount_per_line() {
        // X: 50 x 2 = 100, Y: 30 at 10% = 27 x 1. Total 127.
        let mut cart = empty_cart();
        let x = product("x", dec!(50), 0);
        let y = product("y", dec!(30), 10);
        cart.add(&x);
        cart.add(&x);
        cart.add(&y);
        assert_eq!(cart.total(), dec!(127));
    }

    #[test]
    fn test_total_is_order_independent() {
        let x = product("x", dec!(50), 0);
        let y = product("y", dec!(30), 10);

        let mut forward = empty_cart();
        forward.add(&x);
        forward.add(&y);

        let mut backward = empty_cart();
        backward.add(&y);
        backward.add(&x);

        assert_eq!(forward.total(), backward.total());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = empty_cart();
        let p = product("p-1", dec!(10), 0);
        cart.add(&p);
        cart.set_quantity(&p.id, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_mutating_unknown_id_is_noop() {
        let mut cart = empty_cart();
        let p = product("p-1", dec!(10), 0);
        cart.add(&p);

        cart.set_quantity(&ProductId::new("ghost"), 5);
        cart.remove(&ProductId::new("ghost"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = empty_cart();
        cart.add(&product("a", dec!(5), 0));
        cart.add(&product("b", dec!(7), 0));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_cart_survives_reload() {
        let local: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        {
            let mut cart = Cart::load(Arc::clone(&local));
            cart.add(&product("p-1", dec!(20), 0));
            cart.add(&product("p-1", dec!(20), 0));
        }
        let reloaded = Cart::load(local);
        assert_eq!(reloaded.count(), 2);
        assert_eq!(reloaded.total(), dec!(40));
    }

    #[test]
    fn test_refresh_resolves_stale_snapshots() {
        let mut cart = empty_cart();
        cart.add(&product("p-1", dec!(100), 0));

        // Price dropped and a discount appeared since the line was added.
        let catalog = vec![product("p-1", dec!(90), 10)];
        assert_eq!(cart.total(), dec!(100));
        cart.refresh(&catalog);
        assert_eq!(cart.total(), dec!(81));
    }
}
