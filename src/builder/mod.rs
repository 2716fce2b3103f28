//! Builder API for declaring models.
//!
//! A model is assembled imperatively through [`ModelBuilder`], which hands
//! out ids for every vertex and region it creates, while transitions are
//! declared with the fluent [`TransitionBuilder`]. Calling
//! [`ModelBuilder::build`] computes every transition's traversal chains and
//! runs the model rules; the resulting [`Model`](crate::model::Model) is
//! immutable.

pub mod error;
pub mod model;
pub mod transition;

pub use error::BuildError;
pub use model::{ModelBuilder, DEFAULT_REGION};
pub use transition::{TransitionBuilder, TransitionSpec};
