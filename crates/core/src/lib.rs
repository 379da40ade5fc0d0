//! Amberline Core - Shared types and pricing rules.
//!
//! This crate provides the domain model used across all Amberline components:
//! - `storefront` - Client-side storefront core (cart, ledger, verification)
//! - `cli` - Command-line tools for verification and code minting
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no local storage. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed records for products, users, cart lines, and codes
//! - [`pricing`] - Pure discount, points, and redemption-cap arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use types::*;
