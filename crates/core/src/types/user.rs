//! User records and the per-user points ledger counters.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};

/// User role as stored by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(rename = "user")]
    Customer,
}

/// A user record with its loyalty-points ledger.
///
/// Ledger invariants:
/// - `total_points` and `used_points` only ever grow (lifetime counters).
/// - `available_points` is the running balance and never goes negative.
/// - `purchased_products` is an append-only multiset of product ids.
///
/// The counters are mutated only through the ledger service; nothing else
/// in the core writes to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Lifetime points earned.
    #[serde(default)]
    pub total_points: u64,
    /// Lifetime points redeemed.
    #[serde(default)]
    pub used_points: u64,
    /// Current redeemable balance.
    #[serde(default)]
    pub available_points: u64,
    /// Product ids from settled purchases, with repeats.
    #[serde(default)]
    pub purchased_products: Vec<ProductId>,
}

impl User {
    /// Create a fresh customer account with all ledger counters at zero.
    #[must_use]
    pub fn new_member(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: Role::Customer,
            total_points: 0,
            used_points: 0,
            available_points: 0,
            purchased_products: Vec::new(),
        }
    }
}
