//! Model rules evaluated with `Validation`, so every violation is reported
//! in a single pass.

use crate::core::VertexKind;
use crate::model::Model;
use crate::validation::violations::ModelViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for custom model checks.
pub type ModelCheck<M> =
    Box<dyn Fn(&Model<M>) -> Validation<(), NonEmptyVec<ModelViolation>> + Send + Sync>;

/// Rules a model must satisfy before it is frozen.
///
/// Structural rules always run. Guard exclusivity can only be checked
/// against concrete messages, so it runs for the sample messages registered
/// through [`RulesBuilder`](crate::validation::RulesBuilder).
pub struct ModelRules<M> {
    pub(crate) samples: Vec<(M, String)>,
    pub(crate) exclusive_completions: bool,
    pub(crate) required_checks: Vec<ModelCheck<M>>,
}

impl<M> ModelRules<M> {
    /// Structural rules only.
    pub fn structural() -> Self {
        Self {
            samples: Vec::new(),
            exclusive_completions: false,
            required_checks: Vec::new(),
        }
    }

    /// Validate all rules, accumulating ALL violations.
    pub fn validate(&self, model: &Model<M>) -> Validation<(), NonEmptyVec<ModelViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ModelViolation>>> = Vec::new();

        for (_, region) in model.regions() {
            let check = if region.initial().is_some() {
                Validation::success(())
            } else {
                Validation::fail(ModelViolation::MissingInitial {
                    region: region.name().to_string(),
                    owner: model.v(region.owner()).name().to_string(),
                })
            };
            checks.push(check);
        }

        for (_, transition) in model.transitions() {
            if let Some(target) = transition.target() {
                let target = model.v(target);
                if target.kind() == VertexKind::Initial {
                    checks.push(Validation::fail(ModelViolation::PseudostateTarget {
                        from: model.v(transition.source()).name().to_string(),
                        target: target.name().to_string(),
                    }));
                }
            }
        }

        for (message, description) in &self.samples {
            for (_, vertex) in model.vertices() {
                let satisfied = vertex
                    .transitions()
                    .iter()
                    .filter(|id| model.t(**id).accepts(message))
                    .count();
                if satisfied > 1 {
                    checks.push(Validation::fail(ModelViolation::AmbiguousGuards {
                        state: vertex.name().to_string(),
                        message: description.clone(),
                        satisfied,
                    }));
                }
            }
        }

        if self.exclusive_completions {
            for (_, vertex) in model.vertices() {
                let satisfied = vertex
                    .completions()
                    .iter()
                    .filter(|id| model.t(**id).completes())
                    .count();
                if satisfied > 1 {
                    checks.push(Validation::fail(ModelViolation::AmbiguousCompletions {
                        state: vertex.name().to_string(),
                        satisfied,
                    }));
                }
            }
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(model));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<M> Default for ModelRules<M> {
    fn default() -> Self {
        Self::structural()
    }
}
