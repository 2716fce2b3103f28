//! Statechart: a hierarchical state machine engine
//!
//! A statechart is declared once with a [`ModelBuilder`], frozen into an
//! immutable [`Model`], and then driven by any number of [`Instance`]s that
//! share it. The model holds the topology; each instance keeps only its
//! active configuration, staged through a [`Transaction`] so that a stimulus
//! either commits as a whole or not at all.
//!
//! # Core Concepts
//!
//! - **Vertex**: a state, a final state or an initial pseudostate
//! - **Region**: a container of vertices owned by a state; several regions
//!   make the state orthogonal
//! - **Transition**: source and target with precomputed exit and enter
//!   chains, triggered by a message or by completion
//! - **Completion**: a state whose regions all rest in final states fires its
//!   completion transition, which also joins orthogonal regions
//!
//! # Example
//!
//! ```rust
//! use statechart::{Instance, ModelBuilder, TransitionBuilder};
//! use std::sync::Arc;
//!
//! #[derive(Debug, PartialEq)]
//! enum Door {
//!     Open,
//!     Close,
//! }
//!
//! let mut builder = ModelBuilder::<Door>::new();
//! let door = builder.root("door");
//! let top = builder.default_region(door).unwrap();
//! let closed = builder.state("closed", top).unwrap();
//! let opened = builder.state("opened", top).unwrap();
//! builder.initial(top, closed).unwrap();
//! builder
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(closed)
//!             .to(opened)
//!             .when(|m| *m == Door::Open),
//!     )
//!     .unwrap();
//! builder
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(opened)
//!             .to(closed)
//!             .when(|m| *m == Door::Close),
//!     )
//!     .unwrap();
//!
//! let model = Arc::new(builder.build().unwrap());
//! let instance = Instance::new(model, door).unwrap();
//! instance.initialise().unwrap();
//!
//! assert!(instance.process(&Door::Open).unwrap());
//! assert!(instance.is_active(opened));
//! assert!(!instance.process(&Door::Open).unwrap());
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, ModelBuilder, TransitionBuilder};
pub use crate::core::{Action, ActionError, Guard, RegionId, TransitionId, VertexId, VertexKind};
pub use engine::{
    AmbiguityPolicy, Configuration, ConfigurationStore, EngineConfig, EngineError, Instance,
    MemoryStore, Transaction,
};
pub use model::{Model, Transition, Visitor};
pub use validation::{ModelRules, ModelViolation, RulesBuilder};
