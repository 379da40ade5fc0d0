//! Catalog product records.
//!
//! Products carry the authenticity codes attached to physical units and the
//! audio tracks played back after a successful verification. Records are
//! normalized once, where they cross from the remote store into the core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A one-time authenticity code attached to a physical product unit.
///
/// Codes are never deleted by the verification flow; `used` transitions
/// false -> true exactly once and never back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCode {
    pub code: String,
    #[serde(default)]
    pub used: bool,
}

impl AuthCode {
    /// Create a fresh (unused) code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            used: false,
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Decimal,
    /// Percent discount, 0-100. 0 means no discount.
    #[serde(default, rename = "discount")]
    pub discount_percent: u8,
    #[serde(default)]
    pub auth_codes: Vec<AuthCode>,
    #[serde(default)]
    pub audio_tracks: Vec<String>,
}

impl Product {
    /// Normalize a record that crossed from the loosely-typed remote store.
    ///
    /// Clamps the discount to 0-100 and trims stray whitespace from
    /// authenticity codes (the admin panel accepts free-text input).
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.discount_percent > 100 {
            self.discount_percent = 100;
        }
        for entry in &mut self.auth_codes {
            let trimmed = entry.code.trim();
            if trimmed.len() != entry.code.len() {
                entry.code = trimmed.to_owned();
            }
        }
        self
    }

    /// Find an authenticity code entry by exact, case-sensitive match.
    #[must_use]
    pub fn find_code(&self, code: &str) -> Option<&AuthCode> {
        self.auth_codes.iter().find(|c| c.code == code)
    }
}
