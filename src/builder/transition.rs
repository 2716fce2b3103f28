//! Builder for declaring transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, VertexId};
use crate::model::Trigger;

/// A declared transition whose traversal chains are not computed yet.
///
/// Produced by [`TransitionBuilder::build`] and resolved against the full
/// topology when the model is built.
#[derive(Debug)]
pub struct TransitionSpec<M> {
    pub(crate) source: VertexId,
    pub(crate) target: Option<VertexId>,
    pub(crate) trigger: Trigger<M>,
    pub(crate) deep_history: bool,
}

impl<M> TransitionSpec<M> {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> Option<VertexId> {
        self.target
    }
}

/// Builder for transitions with a fluent API.
///
/// A message transition without `.when(..)` fires for every message; a
/// transition without `.to(..)` is internal.
///
/// ```rust
/// use statechart::builder::{ModelBuilder, TransitionBuilder};
///
/// let mut model = ModelBuilder::<&'static str>::new();
/// let machine = model.root("machine");
/// let top = model.default_region(machine).unwrap();
/// let idle = model.state("idle", top).unwrap();
/// let busy = model.state("busy", top).unwrap();
/// model.initial(top, idle).unwrap();
///
/// model
///     .transition(TransitionBuilder::new().from(idle).to(busy).when(|m| *m == "go"))
///     .unwrap();
/// model
///     .transition(TransitionBuilder::completion().from(busy).to(idle))
///     .unwrap();
///
/// assert!(model.build().is_ok());
/// ```
pub struct TransitionBuilder<M> {
    from: Option<VertexId>,
    to: Option<VertexId>,
    guard: Option<Guard<M>>,
    completion: Option<Guard<()>>,
    deep_history: bool,
}

impl<M> TransitionBuilder<M> {
    /// Start a message-triggered transition.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            completion: None,
            deep_history: false,
        }
    }

    /// Start a completion transition, fired when the source state completes.
    pub fn completion() -> Self {
        Self {
            completion: Some(Guard::always()),
            ..Self::new()
        }
    }

    /// Set the source vertex (required).
    pub fn from(mut self, vertex: VertexId) -> Self {
        self.from = Some(vertex);
        self
    }

    /// Set the target vertex. Omit for an internal transition.
    pub fn to(mut self, vertex: VertexId) -> Self {
        self.to = Some(vertex);
        self
    }

    /// Add a message guard (optional).
    pub fn guard(mut self, guard: Guard<M>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a message guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Turn this into a completion transition guarded by `predicate`.
    pub fn completion_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.completion = Some(Guard::new(move |_: &()| predicate()));
        self
    }

    /// Enter the target restoring the last active vertex of every
    /// history-enabled region below it.
    pub fn deep_history(mut self) -> Self {
        self.deep_history = true;
        self
    }

    /// Build the transition declaration.
    pub fn build(self) -> Result<TransitionSpec<M>, BuildError> {
        let source = self.from.ok_or(BuildError::MissingFromState)?;

        let trigger = match (self.completion, self.guard) {
            (Some(_), Some(_)) => return Err(BuildError::MixedTrigger),
            (Some(completion), None) => Trigger::Completion(completion),
            (None, guard) => Trigger::Message(guard.unwrap_or_default()),
        };

        Ok(TransitionSpec {
            source,
            target: self.to,
            trigger,
            deep_history: self.deep_history,
        })
    }
}

impl<M> Default for TransitionBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
