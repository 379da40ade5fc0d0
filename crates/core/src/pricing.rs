//! Pure pricing arithmetic: discounts, points, and redemption caps.
//!
//! Everything in here is deterministic and side-effect free. All currency
//! amounts are [`Decimal`] (EGP); points are whole `u64` counts.
//!
//! # Rules
//!
//! - 1 EGP actually paid earns 1 point; fractions are dropped, never
//!   rounded up.
//! - 1 point redeems for 0.5 EGP, a fixed exchange rate.
//! - Redemption may never push the payable amount below zero.

use rust_decimal::Decimal;
use rust_decimal::dec;
use rust_decimal::prelude::ToPrimitive;

/// Currency value of a single loyalty point, in EGP.
pub const POINT_VALUE: Decimal = dec!(0.5);

/// Points awarded for a fresh authenticity-code verification.
pub const VERIFICATION_AWARD: u64 = 50;

/// Final price after the percent discount.
///
/// Returns `price` unchanged when there is no discount. The data model
/// caps the discount at 100, so the result is never negative for valid
/// records; this function does not re-validate.
#[must_use]
pub fn final_price(price: Decimal, discount_percent: u8) -> Decimal {
    if discount_percent == 0 {
        return price;
    }
    price - price * Decimal::from(discount_percent) / dec!(100)
}

/// Points earned for a payable amount: `floor(payable)`.
///
/// A non-positive payable earns nothing.
#[must_use]
pub fn points_earned(payable: Decimal) -> u64 {
    if payable <= Decimal::ZERO {
        return 0;
    }
    payable.floor().to_u64().unwrap_or(0)
}

/// Currency value of a point balance: `points x 0.5 EGP`.
#[must_use]
pub fn points_to_currency(points: u64) -> Decimal {
    Decimal::from(points) * POINT_VALUE
}

/// Largest redemption that keeps the payable amount non-negative.
///
/// The value cap `floor(payable / 0.5)` is computed independently of the
/// owned balance, then intersected with it.
#[must_use]
pub fn max_redeemable_points(payable: Decimal, available_points: u64) -> u64 {
    if payable <= Decimal::ZERO {
        return 0;
    }
    let by_value = (payable / POINT_VALUE).floor().to_u64().unwrap_or(0);
    by_value.min(available_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_price_zero_discount_is_identity() {
        assert_eq!(final_price(dec!(100), 0), dec!(100));
        assert_eq!(final_price(dec!(49.99), 0), dec!(49.99));
    }

    #[test]
    fn test_final_price_never_exceeds_price() {
        for discount in [1u8, 10, 33, 50, 99, 100] {
            let result = final_price(dec!(80), discount);
            assert!(result <= dec!(80), "discount {discount} raised the price");
            assert!(result >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_final_price_full_discount_is_free() {
        assert_eq!(final_price(dec!(123.45), 100), Decimal::ZERO);
    }

    #[test]
    fn test_points_earned_floors() {
        assert_eq!(points_earned(dec!(60)), 60);
        assert_eq!(points_earned(dec!(60.99)), 60);
        assert_eq!(points_earned(dec!(0.49)), 0);
        assert_eq!(points_earned(Decimal::ZERO), 0);
        assert_eq!(points_earned(dec!(-5)), 0);
    }

    #[test]
    fn test_points_to_currency_rate() {
        assert_eq!(points_to_currency(0), Decimal::ZERO);
        assert_eq!(points_to_currency(1), dec!(0.5));
        assert_eq!(points_to_currency(40), dec!(20));
    }

    #[test]
    fn test_max_redeemable_bounded_by_balance() {
        assert_eq!(max_redeemable_points(dec!(1000), 12), 12);
    }

    #[test]
    fn test_max_redeemable_bounded_by_order_value() {
        // 10 EGP payable covers at most 20 points worth of discount.
        assert_eq!(max_redeemable_points(dec!(10), 500), 20);
        assert_eq!(max_redeemable_points(dec!(10.25), 500), 20);
    }

    #[test]
    fn test_max_redeemable_never_over_discounts() {
        for (payable, available) in [(dec!(0.3), 100u64), (dec!(7.75), 9), (dec!(60), 40)] {
            let cap = max_redeemable_points(payable, available);
            assert!(cap <= available);
            assert!(points_to_currency(cap) <= payable);
        }
    }

    #[test]
    fn test_max_redeemable_zero_payable() {
        assert_eq!(max_redeemable_points(Decimal::ZERO, 99), 0);
        assert_eq!(max_redeemable_points(dec!(-1), 99), 0);
    }

    #[test]
    fn test_scenario_discounted_purchase_with_redemption() {
        // Price 100 at 20% off -> 80; redeeming 40 points (20 EGP) leaves
        // 60 payable, which earns 60 points.
        let discounted = final_price(dec!(100), 20);
        assert_eq!(discounted, dec!(80));

        let payable = discounted - points_to_currency(40);
        assert_eq!(payable, dec!(60));
        assert_eq!(points_earned(payable), 60);
    }
}
