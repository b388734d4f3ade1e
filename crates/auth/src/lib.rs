//! Bearer-token authentication.
//!
//! HS256 JWTs with a fixed lifetime. Tokens are issued by `/token`, either
//! freely (development) or against one configured account whose password is
//! stored as an Argon2 PHC string.
//!
//! ## Tokens
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//!
//! ## Credentials
//!
//! - [`Access`] — Who may obtain a token
//! - [`password`] — Argon2 hashing and verification
//!
//! ## Server
//!
//! - [`Auth`] — actix extractor rejecting requests without a valid token
//! - [`token`] — Token issuance handler
mod access;
mod claims;
mod crypto;
mod dto;
pub mod password;

pub use access::*;
pub use claims::*;
pub use crypto::*;
pub use dto::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
