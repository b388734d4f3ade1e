//! Model registry, trainer, and classifiers.
//!
//! ## Registry
//!
//! - [`ModelType`] — The closed set of trainable model kinds
//! - [`Registry`] — Resolves identifiers to learner constructors
//!
//! ## Training
//!
//! - [`Params`] — Loosely typed parameters filtered per model kind
//! - [`TrainingSet`] — Validated feature matrix and label vector
//! - [`Trainer`] — Resolves, validates, and fits in one call
//! - [`Source`] — Where the trainer finds named datasets
//!
//! ## Estimators
//!
//! - [`Forest`] — Bagged CART classification trees
//! - [`Logistic`] — Multinomial logistic regression
//! - [`Model`] — Any fitted estimator, serializable for storage
mod error;
mod forest;
mod kind;
mod logistic;
mod model;
mod params;
mod registry;
mod set;
mod source;
mod traits;
mod trainer;
mod tree;

pub use error::*;
pub use forest::*;
pub use kind::*;
pub use logistic::*;
pub use model::*;
pub use params::*;
pub use registry::*;
pub use set::*;
pub use source::*;
pub use traits::*;
pub use trainer::*;
pub use tree::*;
