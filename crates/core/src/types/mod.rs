//! Core types for Amberline.
//!
//! Records arriving from the remote object store are loosely shaped (the
//! store is shared with a JavaScript admin panel), so everything here
//! deserializes tolerantly and normalizes at the boundary.

pub mod cart;
pub mod id;
pub mod product;
pub mod user;

pub use cart::{CartLine, PendingCredit};
pub use id::{ProductId, UserId};
pub use product::{AuthCode, Product};
pub use user::{Role, User};
