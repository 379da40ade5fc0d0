//! REST client for the remote object store.
//!
//! The store is a generic JSON document store: one collection per entity
//! type, addressed as `{base}/{collection}` and `{base}/{collection}/{id}`.
//! Amberline shares it with the admin panel; the core only relies on
//! `update` returning the persisted record so the ledger can resynchronize
//! its in-memory copy.
//!
//! Writes are unconditional full-record overwrites - the store offers no
//! version check, so the last writer wins. No retries and no timeouts
//! beyond the transport's own defaults.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use amberline_core::{Product, User};

/// Errors that can occur when talking to the remote object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The addressed record does not exist.
    #[error("no {collection} record with id {id}")]
    NotFound { collection: &'static str, id: String },

    /// The store answered with a non-success status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode {collection} response: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for the remote object store.
///
/// Cheaply cloneable; the underlying HTTP client and base URL live behind
/// an `Arc`.
#[derive(Debug, Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

#[derive(Debug)]
struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl StoreClient {
    /// Create a new store client for the given base URL.
    ///
    /// `base_url` must be a base URL (http or https): collection and record
    /// paths are appended to it, which is impossible for schemes like
    /// `mailto:`. [`StorefrontConfig::from_env`] validates this already;
    /// callers constructing a client directly must uphold it themselves.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when `base_url` cannot be a base.
    ///
    /// [`StorefrontConfig::from_env`]: crate::config::StorefrontConfig::from_env
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        debug_assert!(
            !base_url.cannot_be_a_base(),
            "store base URL must be a base URL (http/https)"
        );
        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Typed access to the `products` collection.
    ///
    /// Records are passed through [`Product::normalize`] after decoding.
    #[must_use]
    pub fn products(&self) -> Products {
        Products {
            inner: Collection::new(self.clone(), "products"),
        }
    }

    /// Typed access to the `users` collection.
    #[must_use]
    pub fn users(&self) -> Users {
        Users {
            inner: Collection::new(self.clone(), "users"),
        }
    }

    /// Build the endpoint URL for a collection, optionally with a record id.
    fn endpoint(&self, collection: &str, id: Option<&str>) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

/// A typed view of one store collection.
///
/// Exposes the five generic operations every entity type supports. The
/// store replies with the stored record(s); `update` PUTs the full record
/// and returns the persisted copy.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    client: StoreClient,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(client: StoreClient, name: &'static str) -> Self {
        Self {
            client,
            name,
            _marker: PhantomData,
        }
    }

    /// Fetch every record in the collection.
    #[instrument(skip(self), fields(collection = self.name))]
    pub async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        let url = self.client.endpoint(self.name, None);
        let response = self.client.inner.client.get(url).send().await?;
        self.decode(response, None).await
    }

    /// Fetch a single record by id.
    #[instrument(skip(self), fields(collection = self.name))]
    pub async fn get_by_id(&self, id: &str) -> Result<T, StoreError> {
        let url = self.client.endpoint(self.name, Some(id));
        let response = self.client.inner.client.get(url).send().await?;
        self.decode(response, Some(id)).await
    }

    /// Create a record; returns the stored copy (with its assigned id).
    #[instrument(skip(self, record), fields(collection = self.name))]
    pub async fn create(&self, record: &T) -> Result<T, StoreError> {
        let url = self.client.endpoint(self.name, None);
        let response = self
            .client
            .inner
            .client
            .post(url)
            .json(record)
            .send()
            .await?;
        self.decode(response, None).await
    }

    /// Overwrite a record with a full replacement; returns the persisted copy.
    #[instrument(skip(self, record), fields(collection = self.name))]
    pub async fn update(&self, id: &str, record: &T) -> Result<T, StoreError> {
        let url = self.client.endpoint(self.name, Some(id));
        let response = self
            .client
            .inner
            .client
            .put(url)
            .json(record)
            .send()
            .await?;
        self.decode(response, Some(id)).await
    }

    /// Delete a record by id.
    #[instrument(skip(self), fields(collection = self.name))]
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.client.endpoint(self.name, Some(id));
        let response = self.client.inner.client.delete(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: self.name,
                id: id.to_owned(),
            });
        }
        if !status.is_success() {
            let body = truncate(&response.text().await.unwrap_or_default());
            return Err(StoreError::Status { status, body });
        }
        debug!(id, "record deleted");
        Ok(())
    }

    /// Check status and decode a JSON body, with diagnostics on failure.
    async fn decode<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<R, StoreError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(StoreError::NotFound {
                collection: self.name,
                id: id.to_owned(),
            });
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                collection = self.name,
                status = %status,
                body = %truncate(&body),
                "store returned non-success status"
            );
            return Err(StoreError::Status {
                status,
                body: truncate(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::error!(
                collection = self.name,
                error = %source,
                body = %truncate(&body),
                "failed to decode store response"
            );
            StoreError::Decode {
                collection: self.name,
                source,
            }
        })
    }
}

/// Truncate a response body for logs and error messages.
fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

// =============================================================================
// Typed collections
// =============================================================================

/// The `products` collection, normalized at the boundary.
#[derive(Debug, Clone)]
pub struct Products {
    inner: Collection<Product>,
}

impl Products {
    /// Fetch the full catalog in store order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure or malformed records.
    pub async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.inner.get_all().await?;
        Ok(products.into_iter().map(Product::normalize).collect())
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub async fn get_by_id(&self, id: &str) -> Result<Product, StoreError> {
        Ok(self.inner.get_by_id(id).await?.normalize())
    }

    /// Create a product record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn create(&self, product: &Product) -> Result<Product, StoreError> {
        Ok(self.inner.create(product).await?.normalize())
    }

    /// Overwrite a product record; returns the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn update(&self, id: &str, product: &Product) -> Result<Product, StoreError> {
        Ok(self.inner.update(id, product).await?.normalize())
    }

    /// Delete a product record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// The `users` collection.
#[derive(Debug, Clone)]
pub struct Users {
    inner: Collection<User>,
}

impl Users {
    /// Fetch all user records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure or malformed records.
    pub async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        self.inner.get_all().await
    }

    /// Fetch one user by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.inner.get_by_id(id).await
    }

    /// Create a user record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn create(&self, user: &User) -> Result<User, StoreError> {
        self.inner.create(user).await
    }

    /// Overwrite a user record; returns the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn update(&self, id: &str, user: &User) -> Result<User, StoreError> {
        self.inner.update(id, user).await
    }

    /// Delete a user record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}
