//! The per-user points ledger: settlement and verification credits.
//!
//! Ledger mutations are split in two layers. [`apply_settlement`] and
//! [`apply_verification_credit`] are pure: they take the current user
//! snapshot and return the next one, so the counter arithmetic is testable
//! without any I/O. [`LedgerService`] wraps them with the write-back to the
//! remote store and returns the persisted copy, which the caller commits
//! as its new source of truth.
//!
//! Compute-then-write: a failed store write leaves every input untouched
//! and nothing is retried. The remote store is last-write-wins, so a
//! settlement computed from a stale snapshot (another tab, another device)
//! can silently overwrite a newer record; that is the documented
//! consistency model.

use rust_decimal::Decimal;
use tracing::instrument;

use amberline_core::pricing::{max_redeemable_points, points_earned, points_to_currency};
use amberline_core::{Product, User};

use crate::store::{StoreClient, StoreError, Users};

/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The requested redemption exceeds the computed cap.
    ///
    /// The cap is `min(available balance, floor(payable / 0.5))`; anything
    /// above it would drive the payable amount or the balance negative.
    #[error("cannot redeem {requested} points, cap is {cap}")]
    RedemptionExceedsCap { requested: u64, cap: u64 },

    /// The write to the remote store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Compute the post-settlement user snapshot.
///
/// `payable_amount` is the discounted price before the points redemption
/// is subtracted. The actual amount paid,
/// `payable_amount - points_used x 0.5 EGP`, earns one point per whole
/// EGP. The product id is appended to the purchase history (with repeats -
/// it is a multiset).
///
/// # Errors
///
/// Returns [`LedgerError::RedemptionExceedsCap`] when `points_used`
/// exceeds `max_redeemable_points(payable_amount, available)`. The check
/// keeps `available_points` from ever going negative.
pub fn apply_settlement(
    user: &User,
    product: &Product,
    payable_amount: Decimal,
    points_used: u64,
) -> Result<User, LedgerError> {
    let cap = max_redeemable_points(payable_amount, user.available_points);
    if points_used > cap {
        return Err(LedgerError::RedemptionExceedsCap {
            requested: points_used,
            cap,
        });
    }

    let earned = points_earned(payable_amount - points_to_currency(points_used));

    let mut next = user.clone();
    next.total_points += earned;
    next.used_points += points_used;
    // points_used <= cap <= available, so this cannot underflow.
    next.available_points = next.available_points - points_used + earned;
    next.purchased_products.push(product.id.clone());
    Ok(next)
}

/// Compute the user snapshot after a fixed verification award.
///
/// The earning event is a physical-product scan, not a checkout, so the
/// award is fixed rather than price-derived and no points are redeemed.
#[must_use]
pub fn apply_verification_credit(user: &User, award: u64) -> User {
    let mut next = user.clone();
    next.total_points += award;
    next.available_points += award;
    next
}

/// Service committing ledger mutations to the remote store.
#[derive(Debug, Clone)]
pub struct LedgerService {
    users: Users,
}

impl LedgerService {
    /// Create a ledger service backed by the given store client.
    #[must_use]
    pub fn new(client: &StoreClient) -> Self {
        Self {
            users: client.users(),
        }
    }

    /// Settle a purchase and persist the full updated user record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::RedemptionExceedsCap`] before any write, or
    /// a store error if the write-back fails; in both cases no state has
    /// changed anywhere.
    #[instrument(skip(self, user, product), fields(user = %user.id, product = %product.id))]
    pub async fn settle_purchase(
        &self,
        user: &User,
        product: &Product,
        payable_amount: Decimal,
        points_used: u64,
    ) -> Result<User, LedgerError> {
        let next = apply_settlement(user, product, payable_amount, points_used)?;
        let persisted = self.users.update(next.id.as_str(), &next).await?;
        tracing::info!(points_used, "purchase settled");
        Ok(persisted)
    }

    /// Credit a fixed verification award and persist the user record.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write-back fails; in-memory state is
    /// untouched in that case.
    #[instrument(skip(self, user, product), fields(user = %user.id, product = %product.id))]
    pub async fn credit_verification(
        &self,
        user: &User,
        product: &Product,
        award: u64,
    ) -> Result<User, LedgerError> {
        let next = apply_verification_credit(user, award);
        let persisted = self.users.update(next.id.as_str(), &next).await?;
        tracing::info!(award, "verification credited");
        Ok(persisted)
    }
}
