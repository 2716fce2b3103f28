//! Validation-based rules for models.
//!
//! Models are checked with Stillwater's `Validation` type, which accumulates
//! ALL violations instead of stopping at the first one, so an author sees
//! every problem with a model in a single build.
//!
//! Structural rules run on every [`ModelBuilder::build`]. Guard exclusivity
//! cannot be decided from closures alone; register sample messages to have
//! it checked as well.
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{ModelBuilder, TransitionBuilder};
//! use statechart::validation::RulesBuilder;
//!
//! let mut builder = ModelBuilder::<u32>::new();
//! let machine = builder.root("counter");
//! let top = builder.default_region(machine).unwrap();
//! let low = builder.state("low", top).unwrap();
//! let high = builder.state("high", top).unwrap();
//! builder.initial(top, low).unwrap();
//! builder
//!     .transition(TransitionBuilder::new().from(low).to(high).when(|n| *n > 10))
//!     .unwrap();
//! builder
//!     .transition(TransitionBuilder::new().from(low).when(|n| *n <= 10))
//!     .unwrap();
//!
//! let rules = RulesBuilder::new().samples([0, 10, 11, 500]).build();
//! assert!(builder.rules(rules).build().is_ok());
//! ```
//!
//! [`ModelBuilder::build`]: crate::builder::ModelBuilder::build

pub mod builder;
pub mod rules;
pub mod violations;

pub use builder::RulesBuilder;
pub use rules::{ModelCheck, ModelRules};
pub use violations::ModelViolation;
