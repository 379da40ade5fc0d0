//! Pre-filled order-message composition.
//!
//! No money moves through Amberline: "checkout" composes a WhatsApp
//! message carrying the order summary and hands the link to the external
//! channel. Redeemed points are settled through the ledger separately,
//! once the order is confirmed.

use rust_decimal::Decimal;

use amberline_core::pricing::{final_price, points_to_currency};
use amberline_core::Product;

use crate::cart::Cart;

/// Format an amount as Egyptian currency, two decimal places.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("{amount:.2} EGP")
}

/// A composed order: the message text and the channel link carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage {
    pub text: String,
    pub link: String,
}

/// Composes order messages addressed to the configured phone number.
#[derive(Debug, Clone)]
pub struct CheckoutComposer {
    phone: String,
}

impl CheckoutComposer {
    /// Create a composer for the given WhatsApp phone number.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }

    /// Compose a single-product order.
    ///
    /// `points_used` must already satisfy the redemption cap; the composer
    /// only renders the numbers.
    #[must_use]
    pub fn product_order(&self, product: &Product, points_used: u64) -> OrderMessage {
        let discounted = final_price(product.price, product.discount_percent);
        let payable = discounted - points_to_currency(points_used);

        let mut lines = vec![
            "*Amberline - New Order*".to_owned(),
            format!("Product: {}", product.name),
            format!("Category: {}", product.category),
            format!("Price: {}", format_currency(discounted)),
        ];
        push_points_and_total(&mut lines, points_used, payable);
        self.compose(&lines)
    }

    /// Compose an order for the whole cart.
    #[must_use]
    pub fn cart_order(&self, cart: &Cart, points_used: u64) -> OrderMessage {
        let subtotal = cart.total();
        let payable = subtotal - points_to_currency(points_used);

        let mut lines = vec!["*Amberline - New Order*".to_owned()];
        for line in cart.lines() {
            let unit = final_price(line.price, line.discount_percent);
            lines.push(format!(
                "{}x {} - {}",
                line.quantity,
                line.name,
                format_currency(unit * Decimal::from(line.quantity))
            ));
        }
        lines.push(format!("Subtotal: {}", format_currency(subtotal)));
        push_points_and_total(&mut lines, points_used, payable);
        self.compose(&lines)
    }

    fn compose(&self, lines: &[String]) -> OrderMessage {
        let text = lines.join("\n");
        let link = format!(
            "https://wa.me/{}?text={}",
            self.phone,
            urlencoding::encode(&text)
        );
        OrderMessage { text, link }
    }
}

fn push_points_and_total(lines: &mut Vec<String>, points_used: u64, payable: Decimal) {
    if points_used > 0 {
        lines.push(format!(
            "Points redeemed: {} pts (-{})",
            points_used,
            format_currency(points_to_currency(points_used))
        ));
    }
    lines.push(format!("Total payable: {}", format_currency(payable)));
    lines.push("Please confirm my order. Thank you!".to_owned());
}
