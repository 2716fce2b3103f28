//! Running instances of a model.
//!
//! An [`Instance`] applies stimuli (initialisation and messages) to a shared
//! [`Model`](crate::model::Model). Every stimulus runs inside a
//! [`Transaction`]: the active configuration it stages becomes visible only
//! on commit, and an error anywhere in the cascade leaves the committed
//! configuration untouched.

pub mod config;
pub mod error;
mod executor;
pub mod instance;
pub mod store;
pub mod transaction;

pub use config::{AmbiguityPolicy, EngineConfig, EngineConfigBuilder, DEFAULT_MAX_CASCADE_DEPTH};
pub use error::EngineError;
pub use instance::Instance;
pub use store::{Configuration, ConfigurationStore, MemoryStore, Slot};
pub use transaction::Transaction;
