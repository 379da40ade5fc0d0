//! One-time authenticity-code verification.
//!
//! Each physical product unit carries a unique code (`NFC-XXXX-XXXX`). A
//! scan classifies the code against the catalog and, on the first valid
//! scan only, awards loyalty points, consumes the code, and starts brand
//! audio playback. Every later scan of the same code reports
//! authentic-but-already-used with no further side effects.
//!
//! # Consistency
//!
//! Consuming a code is a read-modify-write of the product's code list
//! against a store with no conditional writes. Two near-simultaneous scans
//! of the same fresh code can therefore both observe it unused and
//! double-credit points. The window is narrowed by re-fetching the product
//! right before classifying and mutating, but it is not closed; within one
//! client, scans are serialized by the UI and the problem does not arise.

use std::sync::Arc;

use tracing::{info, instrument};

use amberline_core::pricing::VERIFICATION_AWARD;
use amberline_core::{PendingCredit, Product, User};

use crate::error::Result;
use crate::ledger::LedgerService;
use crate::local::{LocalStore, keys};
use crate::playback::PlaybackTrigger;
use crate::store::{Products, StoreClient};

/// How a scanned code classified against the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CodeMatch<'a> {
    /// No product carries this code.
    NotFound,
    /// The code exists but was consumed by an earlier scan.
    Used(&'a Product),
    /// The code exists and has never been consumed.
    Fresh(&'a Product),
}

/// Scan the catalog for an exact, case-sensitive code match.
///
/// First match in catalog order wins. Codes are expected to be globally
/// unique; if they are not, later duplicates are simply never reached.
#[must_use]
pub fn scan_catalog<'a>(catalog: &'a [Product], code: &str) -> CodeMatch<'a> {
    for product in catalog {
        if let Some(entry) = product.find_code(code) {
            return if entry.used {
                CodeMatch::Used(product)
            } else {
                CodeMatch::Fresh(product)
            };
        }
    }
    CodeMatch::NotFound
}

/// UI-facing verification result.
#[derive(Debug, Clone)]
pub struct Verification {
    /// The code belongs to a genuine product (fresh or already consumed).
    pub authentic: bool,
    /// The code was consumed by an earlier scan; no points were awarded.
    pub already_used: bool,
    /// The matched product, surfaced for display even when already used.
    pub product: Option<Product>,
    /// The persisted user snapshot after a signed-in fresh scan.
    pub updated_user: Option<User>,
}

impl Verification {
    fn not_found() -> Self {
        Self {
            authentic: false,
            already_used: false,
            product: None,
            updated_user: None,
        }
    }

    fn already_used(product: Product) -> Self {
        Self {
            authentic: true,
            already_used: true,
            product: Some(product),
            updated_user: None,
        }
    }

    fn fresh(product: Product, updated_user: Option<User>) -> Self {
        Self {
            authentic: true,
            already_used: false,
            product: Some(product),
            updated_user,
        }
    }
}

/// The verification entry point.
pub struct Verifier {
    products: Products,
    ledger: LedgerService,
    local: Arc<dyn LocalStore>,
    playback: Arc<PlaybackTrigger>,
}

impl Verifier {
    /// Create a verifier over the given store client and local storage.
    #[must_use]
    pub fn new(
        client: &StoreClient,
        local: Arc<dyn LocalStore>,
        playback: Arc<PlaybackTrigger>,
    ) -> Self {
        Self {
            products: client.products(),
            ledger: LedgerService::new(client),
            local,
            playback,
        }
    }

    /// Verify a scanned or typed code.
    ///
    /// The input is trimmed and compared case-sensitively (codes are minted
    /// upper-case, so case mismatches are manual typos and classify as not
    /// found). A fresh match awards [`VERIFICATION_AWARD`] points - through
    /// the ledger when a user is signed in, otherwise as a pending-credit
    /// blob claimed after login - then consumes the code and starts audio
    /// playback if the product has tracks.
    ///
    /// # Errors
    ///
    /// Propagates store and local-storage failures. A malformed or unknown
    /// code is not an error; it yields a non-authentic result.
    #[instrument(skip(self, signed_in), fields(signed_in = signed_in.is_some()))]
    pub async fn verify(&self, code: &str, signed_in: Option<&User>) -> Result<Verification> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(Verification::not_found());
        }

        let catalog = self.products.get_all().await?;
        let matched = match scan_catalog(&catalog, code) {
            CodeMatch::NotFound => {
                info!(code, "code matched no product");
                return Ok(Verification::not_found());
            }
            CodeMatch::Used(product) => {
                info!(code, product = %product.id, "code already consumed");
                return Ok(Verification::already_used(product.clone()));
            }
            CodeMatch::Fresh(product) => product,
        };

        // Re-fetch the matched product so the consume step works on the
        // freshest copy the store can give us. Another client may have
        // consumed the code since the catalog scan.
        let latest = self.products.get_by_id(matched.id.as_str()).await?;
        let Some(entry) = latest.find_code(code) else {
            // The admin rewrote the code list between the two reads.
            return Ok(Verification::not_found());
        };
        if entry.used {
            return Ok(Verification::already_used(latest));
        }

        // Award first, then consume, per the settlement contract: a failed
        // code write leaves the code fresh so the scan can be repeated.
        let updated_user = match signed_in {
            Some(user) => Some(
                self.ledger
                    .credit_verification(user, &latest, VERIFICATION_AWARD)
                    .await?,
            ),
            None => {
                self.record_pending_credit(&latest)?;
                None
            }
        };

        let consumed = self.consume_code(latest, code).await?;
        info!(code, product = %consumed.id, "code verified and consumed");

        self.playback.start(&consumed.audio_tracks);

        Ok(Verification::fresh(consumed, updated_user))
    }

    /// Flip the matched entry's `used` flag and persist the product.
    ///
    /// This is the irreversible step: once the write lands, replays of the
    /// code classify as already-used forever.
    async fn consume_code(&self, mut product: Product, code: &str) -> Result<Product> {
        for entry in &mut product.auth_codes {
            if entry.code == code {
                entry.used = true;
                break;
            }
        }
        let persisted = self.products.update(product.id.as_str(), &product).await?;
        Ok(persisted)
    }

    /// Record a deferred award for a signed-out scan.
    fn record_pending_credit(&self, product: &Product) -> Result<()> {
        let mut pending: Vec<PendingCredit> = self
            .local
            .load(keys::PENDING_CREDITS)?
            .unwrap_or_default();
        pending.push(PendingCredit::new(product.id.clone(), VERIFICATION_AWARD));
        self.local.save(keys::PENDING_CREDITS, &pending)?;
        info!(product = %product.id, "recorded pending verification credit");
        Ok(())
    }

    /// Current playback state (for the verification result page).
    #[must_use]
    pub fn playback_state(&self) -> crate::playback::PlaybackState {
        self.playback.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_codes(id: &str, codes: &[(&str, bool)]) -> Product {
        let auth_codes: Vec<serde_json::Value> = codes
            .iter()
            .map(|(code, used)| serde_json::json!({ "code": code, "used": used }))
            .collect();
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "price": "100",
            "authCodes": auth_codes,
        }))
        .unwrap()
    }

    #[test]
    fn test_scan_unknown_code() {
        let catalog = vec![product_with_codes("p-1", &[("NFC-AAAA-1111", false)])];
        assert_eq!(scan_catalog(&catalog, "XXXX"), CodeMatch::NotFound);
    }

    #[test]
    fn test_scan_fresh_code() {
        let catalog = vec![
            product_with_codes("p-1", &[("NFC-AAAA-1111", true)]),
            product_with_codes("p-2", &[("NFC-BBBB-2222", false)]),
        ];
        let CodeMatch::Fresh(product) = scan_catalog(&catalog, "NFC-BBBB-2222") else {
            panic!("expected fresh match");
        };
        assert_eq!(product.id.as_str(), "p-2");
    }

    #[test]
    fn test_scan_used_code_surfaces_product() {
        let catalog = vec![product_with_codes("p-1", &[("NFC-AAAA-1111", true)])];
        let CodeMatch::Used(product) = scan_catalog(&catalog, "NFC-AAAA-1111") else {
            panic!("expected used match");
        };
        assert_eq!(product.id.as_str(), "p-1");
    }

    #[test]
    fn test_scan_is_case_sensitive() {
        let catalog = vec![product_with_codes("p-1", &[("NFC-AAAA-1111", false)])];
        assert_eq!(scan_catalog(&catalog, "nfc-aaaa-1111"), CodeMatch::NotFound);
    }

    #[test]
    fn test_scan_first_match_wins_in_catalog_order() {
        // Duplicate codes should never exist, but the scan must not fail on
        // them: the first product in catalog order is returned.
        let catalog = vec![
            product_with_codes("p-1", &[("NFC-DUPE-0000", false)]),
            product_with_codes("p-2", &[("NFC-DUPE-0000", false)]),
        ];
        let CodeMatch::Fresh(product) = scan_catalog(&catalog, "NFC-DUPE-0000") else {
            panic!("expected fresh match");
        };
        assert_eq!(product.id.as_str(), "p-1");
    }
}
