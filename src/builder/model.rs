//! Builder for assembling a model's topology.

use crate::builder::error::BuildError;
use crate::builder::transition::{TransitionBuilder, TransitionSpec};
use crate::core::{
    Action, ActionError, Guard, Region, RegionId, TransitionId, Vertex, VertexId, VertexKind,
};
use crate::model::{Model, Transition, Trigger};
use crate::validation::ModelRules;
use stillwater::validation::Validation;

/// Name given to regions created through [`ModelBuilder::default_region`].
pub const DEFAULT_REGION: &str = "default";

/// Builder that declares vertices, regions and transitions, then freezes
/// them into a [`Model`].
///
/// Declaration order matters: regions are initialised and visited in the
/// order they were added, and entry/exit actions run in registration order.
pub struct ModelBuilder<M> {
    vertices: Vec<Vertex>,
    regions: Vec<Region>,
    transitions: Vec<TransitionSpec<M>>,
    rules: ModelRules<M>,
}

impl<M> ModelBuilder<M> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            regions: Vec::new(),
            transitions: Vec::new(),
            rules: ModelRules::default(),
        }
    }

    /// Add a root state (a state machine of its own).
    pub fn root(&mut self, name: impl Into<String>) -> VertexId {
        self.push_vertex(name, None, VertexKind::State)
    }

    /// Add a state to `region`.
    pub fn state(
        &mut self,
        name: impl Into<String>,
        region: RegionId,
    ) -> Result<VertexId, BuildError> {
        self.check_region(region)?;
        Ok(self.push_vertex(name, Some(region), VertexKind::State))
    }

    /// Add a final state to `region`.
    pub fn final_state(
        &mut self,
        name: impl Into<String>,
        region: RegionId,
    ) -> Result<VertexId, BuildError> {
        self.check_region(region)?;
        Ok(self.push_vertex(name, Some(region), VertexKind::Final))
    }

    /// Add a region to `state`, making it composite (orthogonal from the
    /// second region on).
    pub fn region(
        &mut self,
        name: impl Into<String>,
        state: VertexId,
    ) -> Result<RegionId, BuildError> {
        self.check_state(state)?;
        let id = RegionId(self.regions.len());
        self.regions.push(Region::new(name, state));
        self.vertices[state.0].regions.push(id);
        Ok(id)
    }

    /// The region used when `state` is addressed as a container without a
    /// region name; created on first use.
    pub fn default_region(&mut self, state: VertexId) -> Result<RegionId, BuildError> {
        self.check_state(state)?;
        if let Some(region) = self.vertices[state.0].default_region {
            return Ok(region);
        }
        let region = self.region(DEFAULT_REGION, state)?;
        self.vertices[state.0].default_region = Some(region);
        Ok(region)
    }

    /// Declare the default entry of `region`.
    ///
    /// Adds the region's initial pseudostate together with its completion
    /// transition to `target`, which must be a vertex of `region` or nested
    /// below one.
    pub fn initial(&mut self, region: RegionId, target: VertexId) -> Result<VertexId, BuildError> {
        self.check_region(region)?;
        self.check_vertex(target)?;
        if self.regions[region.0].initial.is_some() {
            return Err(BuildError::DuplicateInitial {
                region: self.regions[region.0].name.clone(),
            });
        }
        if !self.is_within(target, region) {
            return Err(BuildError::InitialOutsideRegion {
                region: self.regions[region.0].name.clone(),
                target: self.vertices[target.0].name.clone(),
            });
        }

        let initial = self.push_vertex("initial", Some(region), VertexKind::Initial);
        self.regions[region.0].initial = Some(initial);
        self.push_transition(TransitionSpec {
            source: initial,
            target: Some(target),
            trigger: Trigger::Completion(Guard::always()),
            deep_history: false,
        });
        Ok(initial)
    }

    /// Let `region` remember its last active vertex for deep history
    /// re-entry.
    pub fn history(&mut self, region: RegionId) -> Result<(), BuildError> {
        self.check_region(region)?;
        self.regions[region.0].history = true;
        Ok(())
    }

    /// Subscribe an entry action to `state`.
    pub fn on_entry<F>(&mut self, state: VertexId, action: F) -> Result<(), BuildError>
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.check_state(state)?;
        self.vertices[state.0].entry.push(Action::new(action));
        Ok(())
    }

    /// Subscribe an exit action to `state`.
    pub fn on_exit<F>(&mut self, state: VertexId, action: F) -> Result<(), BuildError>
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.check_state(state)?;
        self.vertices[state.0].exit.push(Action::new(action));
        Ok(())
    }

    /// Add a transition using a builder.
    pub fn transition(
        &mut self,
        builder: TransitionBuilder<M>,
    ) -> Result<TransitionId, BuildError> {
        let spec = builder.build()?;
        self.add_transition(spec)
    }

    /// Add a pre-built transition declaration.
    ///
    /// The source must be a state; pseudostate transitions are declared
    /// through [`ModelBuilder::initial`].
    pub fn add_transition(&mut self, spec: TransitionSpec<M>) -> Result<TransitionId, BuildError> {
        self.check_state(spec.source)?;
        if let Some(target) = spec.target {
            self.check_vertex(target)?;
        }
        Ok(self.push_transition(spec))
    }

    /// Replace the validation rules checked by [`ModelBuilder::build`].
    pub fn rules(mut self, rules: ModelRules<M>) -> Self {
        self.rules = rules;
        self
    }

    /// Resolve every transition and validate the model.
    ///
    /// All rule violations are reported together in
    /// [`BuildError::Invalid`].
    pub fn build(self) -> Result<Model<M>, BuildError> {
        let mut model = Model {
            vertices: self.vertices,
            regions: self.regions,
            transitions: Vec::with_capacity(self.transitions.len()),
        };

        for spec in self.transitions {
            let transition = Transition::new(
                &model,
                spec.source,
                spec.target,
                spec.trigger,
                spec.deep_history,
            )?;
            model.transitions.push(transition);
        }

        match self.rules.validate(&model) {
            Validation::Success(_) => Ok(model),
            Validation::Failure(errors) => {
                Err(BuildError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    fn push_vertex(
        &mut self,
        name: impl Into<String>,
        parent: Option<RegionId>,
        kind: VertexKind,
    ) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(name, parent, kind));
        if let Some(region) = parent {
            self.regions[region.0].vertices.push(id);
        }
        id
    }

    fn push_transition(&mut self, spec: TransitionSpec<M>) -> TransitionId {
        let id = TransitionId(self.transitions.len());
        let source = &mut self.vertices[spec.source.0];
        if spec.trigger.is_completion() {
            source.completions.push(id);
        } else {
            source.transitions.push(id);
        }
        self.transitions.push(spec);
        id
    }

    fn is_within(&self, vertex: VertexId, region: RegionId) -> bool {
        let mut current = vertex;
        while let Some(parent) = self.vertices[current.0].parent {
            if parent == region {
                return true;
            }
            current = self.regions[parent.0].owner;
        }
        false
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), BuildError> {
        if vertex.0 < self.vertices.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownVertex(vertex))
        }
    }

    fn check_state(&self, vertex: VertexId) -> Result<(), BuildError> {
        self.check_vertex(vertex)?;
        let node = &self.vertices[vertex.0];
        if node.is_state() {
            Ok(())
        } else {
            Err(BuildError::NotAState {
                name: node.name.clone(),
            })
        }
    }

    fn check_region(&self, region: RegionId) -> Result<(), BuildError> {
        if region.0 < self.regions.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownRegion(region))
        }
    }
}

impl<M> Default for ModelBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
