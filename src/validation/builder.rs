//! Builder API for assembling model rules.

use crate::model::Model;
use crate::validation::rules::{ModelCheck, ModelRules};
use crate::validation::violations::ModelViolation;
use std::fmt::Debug;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating model rules
pub struct RulesBuilder<M> {
    samples: Vec<(M, String)>,
    exclusive_completions: bool,
    required_checks: Vec<ModelCheck<M>>,
}

impl<M> RulesBuilder<M> {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            exclusive_completions: false,
            required_checks: Vec::new(),
        }
    }

    /// Check that no state has two transitions accepting `message`.
    pub fn sample(mut self, message: M) -> Self
    where
        M: Debug,
    {
        let description = format!("{:?}", message);
        self.samples.push((message, description));
        self
    }

    /// Register several sample messages at once.
    pub fn samples<I>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Debug,
    {
        messages.into_iter().fold(self, |rules, message| rules.sample(message))
    }

    /// Check that no state has two completion transitions enabled at once.
    ///
    /// Completion guards are evaluated once, at validation time.
    pub fn exclusive_completions(mut self) -> Self {
        self.exclusive_completions = true;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&Model<M>) -> Validation<(), NonEmptyVec<ModelViolation>> + Send + Sync + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&Model<M>) -> bool + Send + Sync + 'static,
    {
        let check = move |model: &Model<M>| {
            if predicate(model) {
                Validation::success(())
            } else {
                Validation::fail(ModelViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Build the model rules
    pub fn build(self) -> ModelRules<M> {
        ModelRules {
            samples: self.samples,
            exclusive_completions: self.exclusive_completions,
            required_checks: self.required_checks,
        }
    }
}

impl<M> Default for RulesBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
