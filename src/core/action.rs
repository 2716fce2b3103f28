//! Entry and exit behaviour attached to states.

use std::fmt;
use thiserror::Error;

/// Failure raised by an entry or exit action.
///
/// The engine never swallows these: the error travels back to the caller of
/// `initialise`/`process` and the in-flight transaction is abandoned.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Type alias for action callbacks.
pub type ActionFn = Box<dyn Fn() -> Result<(), ActionError> + Send + Sync>;

/// A zero-argument procedure run when a state is entered or exited.
///
/// States keep an ordered list of these; subscribers run in registration
/// order and an empty list means nothing is subscribed.
pub struct Action {
    callback: ActionFn,
}

impl Action {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Wrap an infallible closure.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(move || {
            callback();
            Ok(())
        })
    }

    pub fn run(&self) -> Result<(), ActionError> {
        (self.callback)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
