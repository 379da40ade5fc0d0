//! Amberline Storefront core.
//!
//! This crate is the client-side heart of the Amberline storefront: the
//! cart, the loyalty-points ledger, and one-time authenticity-code
//! verification. It talks to a generic remote object store over HTTP and
//! keeps cart state and deferred credits in client-local JSON blobs.
//!
//! # Architecture
//!
//! - [`store`] - REST client for the remote object store (products, users)
//! - [`local`] - Keyed client-local persistence (cart, pending credits)
//! - [`cart`] - Quantity-keyed cart with write-through local persistence
//! - [`ledger`] - Purchase settlement and verification credits
//! - [`verify`] - One-time authenticity-code verification state machine
//! - [`playback`] - Hand-off of audio tracks to an external player
//! - [`checkout`] - Pre-filled order-message composition (no payments)
//! - [`codes`] - Authenticity-code minting for the admin tooling
//!
//! Execution is single-client and event-driven: ledger and verifier calls
//! are async but are never issued concurrently within one client. Across
//! clients the remote store is last-write-wins; see the module docs on
//! [`verify`] for the accepted consequences.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod codes;
pub mod config;
pub mod error;
pub mod ledger;
pub mod local;
pub mod playback;
pub mod store;
pub mod verify;

pub use error::{AppError, Result};
