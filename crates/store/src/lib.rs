//! Persistence for fitted models.
//!
//! A [`Store`] maps model names to [`Artifact`]s held in a flat object
//! [`Bucket`]. One object per name, keyed `{name}.json`; writes overwrite.
//!
//! ## Buckets
//!
//! - [`Memory`] — Process-local map, for tests and throwaway servers
//! - [`Local`] — One file per object in a directory
//! - [`Postgres`] — One row per object in a shared table
//!
//! ## Artifacts
//!
//! - [`Artifact`] — Fitted model plus its [`Metadata`]
//! - [`StoreError`] — Invalid names, unreachable buckets, corrupt objects
mod artifact;
mod bucket;
mod error;
mod local;
mod memory;
mod postgres;
mod store;

pub use artifact::*;
pub use bucket::*;
pub use error::*;
pub use local::*;
pub use memory::*;
pub use postgres::*;
pub use store::*;
