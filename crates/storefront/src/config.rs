//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AMBERLINE_STORE_URL` - Base URL of the remote object store
//!
//! ## Optional
//! - `AMBERLINE_DATA_DIR` - Directory for client-local state (default: `.amberline`)
//! - `AMBERLINE_WHATSAPP_PHONE` - Order-channel phone number (default: `201000000000`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Fallback order-channel phone number used when none is configured.
const DEFAULT_WHATSAPP_PHONE: &str = "201000000000";

/// Default directory for client-local blobs (cart, pending credits).
const DEFAULT_DATA_DIR: &str = ".amberline";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote object store.
    pub store_url: Url,
    /// Directory for client-local persisted state.
    pub data_dir: PathBuf,
    /// Phone number the checkout message is addressed to.
    pub whatsapp_phone: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `AMBERLINE_STORE_URL` is missing or not a
    /// valid absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store_url = require_env("AMBERLINE_STORE_URL")?;
        let store_url = Url::parse(&store_url)
            .map_err(|e| ConfigError::InvalidEnvVar("AMBERLINE_STORE_URL".into(), e.to_string()))?;
        if store_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "AMBERLINE_STORE_URL".into(),
                "must be an absolute http(s) URL".into(),
            ));
        }

        let data_dir = std::env::var("AMBERLINE_DATA_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let whatsapp_phone = std::env::var("AMBERLINE_WHATSAPP_PHONE")
            .unwrap_or_else(|_| DEFAULT_WHATSAPP_PHONE.to_owned());

        Ok(Self {
            store_url,
            data_dir,
            whatsapp_phone,
        })
    }
}

/// Read a required environment variable.
fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use super::*;

    // Environment variables are process-global; serialize the tests that
    // touch them and restore the previous value afterwards.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[allow(unsafe_code)]
    fn with_store_url<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::var("AMBERLINE_STORE_URL").ok();
        // SAFETY: no other thread reads or writes the environment while
        // ENV_LOCK is held.
        unsafe {
            match value {
                Some(v) => std::env::set_var("AMBERLINE_STORE_URL", v),
                None => std::env::remove_var("AMBERLINE_STORE_URL"),
            }
        }
        let result = f();
        unsafe {
            match previous {
                Some(v) => std::env::set_var("AMBERLINE_STORE_URL", v),
                None => std::env::remove_var("AMBERLINE_STORE_URL"),
            }
        }
        result
    }

    #[test]
    fn test_from_env_missing_store_url() {
        with_store_url(None, || {
            let err = StorefrontConfig::from_env().unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingEnvVar(name) if name == "AMBERLINE_STORE_URL")
            );
        });
    }

    #[test]
    fn test_from_env_rejects_unparseable_url() {
        with_store_url(Some("not a url"), || {
            let err = StorefrontConfig::from_env().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "AMBERLINE_STORE_URL")
            );
        });
    }

    #[test]
    fn test_from_env_rejects_non_base_url() {
        with_store_url(Some("mailto:shop@amberline.shop"), || {
            let err = StorefrontConfig::from_env().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "AMBERLINE_STORE_URL")
            );
        });
    }

    #[test]
    fn test_from_env_applies_defaults() {
        with_store_url(Some("http://localhost:4000"), || {
            let config = StorefrontConfig::from_env().expect("config should load");
            assert_eq!(config.store_url.as_str(), "http://localhost:4000/");
            if std::env::var("AMBERLINE_DATA_DIR").is_err() {
                assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
            }
            if std::env::var("AMBERLINE_WHATSAPP_PHONE").is_err() {
                assert_eq!(config.whatsapp_phone, DEFAULT_WHATSAPP_PHONE);
            }
        });
    }
}
