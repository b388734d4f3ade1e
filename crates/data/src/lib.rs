//! Dataset catalog.
//!
//! - [`Catalog`] — Directory of CSV training sets, usable as a trainer [`mlh_models::Source`]
//! - [`csv`] — Reading and writing the CSV layout
mod catalog;
pub mod csv;

pub use catalog::*;
