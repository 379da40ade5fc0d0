//! Shared helpers for Amberline integration tests.
//!
//! The tests in `tests/` run against a live generic object store (any
//! JSON document store exposing `/products` and `/users`, e.g. a local
//! json-server instance) and are `#[ignore]`d by default.
//!
//! Run with:
//!
//! ```bash
//! AMBERLINE_STORE_URL=http://localhost:4000 cargo test -p amberline-integration-tests -- --ignored
//! ```

use url::Url;

use amberline_storefront::store::StoreClient;

/// Base URL for the object store (configurable via environment).
#[must_use]
pub fn store_base_url() -> Url {
    let raw = std::env::var("AMBERLINE_STORE_URL")
        .unwrap_or_else(|_| "http://localhost:4000".to_owned());
    Url::parse(&raw).expect("AMBERLINE_STORE_URL must be a valid URL")
}

/// Store client pointed at the configured test store.
#[must_use]
pub fn store_client() -> StoreClient {
    StoreClient::new(store_base_url())
}
