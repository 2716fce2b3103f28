//! The frozen model: an arena of vertices, regions and transitions.
//!
//! A [`Model`] is produced by [`ModelBuilder`](crate::builder::ModelBuilder)
//! and never changes afterwards. Share it behind an `Arc` to drive as many
//! running instances as needed; none of them can mutate the topology.

mod transition;
mod visitor;

pub use transition::{Transition, Trigger};
pub use visitor::Visitor;

use crate::core::{Node, Region, RegionId, TransitionId, Vertex, VertexId};

/// An immutable statechart topology.
#[derive(Debug)]
pub struct Model<M> {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) regions: Vec<Region>,
    pub(crate) transitions: Vec<Transition<M>>,
}

impl<M> Model<M> {
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition<M>> {
        self.transitions.get(id.0)
    }

    pub(crate) fn v(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub(crate) fn r(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    pub(crate) fn t(&self, id: TransitionId) -> &Transition<M> {
        &self.transitions[id.0]
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| (VertexId(index), vertex))
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(index, region)| (RegionId(index), region))
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition<M>)> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(index, transition)| (TransitionId(index), transition))
    }

    /// Vertices without a parent region.
    pub fn roots(&self) -> Vec<VertexId> {
        self.vertices()
            .filter(|(_, vertex)| vertex.parent().is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// First vertex with the given name, in declaration order.
    pub fn find(&self, name: &str) -> Option<VertexId> {
        self.vertices()
            .find(|(_, vertex)| vertex.name() == name)
            .map(|(id, _)| id)
    }

    /// The region used when a composite state is addressed without naming a
    /// region explicitly.
    pub fn default_region(&self, state: VertexId) -> Option<RegionId> {
        self.vertex(state).and_then(|vertex| vertex.default_region)
    }

    /// The state owning the region that contains `vertex`.
    pub fn owner_of(&self, vertex: VertexId) -> Option<VertexId> {
        self.vertex(vertex)
            .and_then(|v| v.parent())
            .map(|region| self.r(region).owner())
    }

    /// Ancestor chain of `vertex`, root first, alternating vertex and region
    /// nodes and ending with `vertex` itself.
    ///
    /// Returns `None` if `vertex` does not belong to this model.
    pub fn ancestors(&self, vertex: VertexId) -> Option<Vec<Node>> {
        let mut chain = vec![Node::Vertex(vertex)];
        let mut current = self.vertex(vertex)?;
        while let Some(region) = current.parent() {
            let owner = self.r(region).owner();
            chain.push(Node::Region(region));
            chain.push(Node::Vertex(owner));
            current = self.v(owner);
        }
        chain.reverse();
        Some(chain)
    }

    /// The root state of the tree containing `vertex`.
    pub fn root_of(&self, vertex: VertexId) -> Option<VertexId> {
        let mut id = vertex;
        let mut current = self.vertex(vertex)?;
        while let Some(region) = current.parent() {
            id = self.r(region).owner();
            current = self.v(id);
        }
        Some(id)
    }

    /// True if `ancestor` is `vertex` or one of its ancestors. Ids from
    /// another model are never contained.
    pub fn contains(&self, ancestor: VertexId, vertex: VertexId) -> bool {
        if self.vertex(ancestor).is_none() {
            return false;
        }
        let mut id = vertex;
        let Some(mut current) = self.vertex(vertex) else {
            return false;
        };
        loop {
            if id == ancestor {
                return true;
            }
            match current.parent() {
                Some(region) => {
                    id = self.r(region).owner();
                    current = self.v(id);
                }
                None => return false,
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ModelBuilder;
    use crate::core::Node;

    #[test]
    fn ancestors_alternate_vertices_and_regions() {
        let mut builder: ModelBuilder<()> = ModelBuilder::new();
        let machine = builder.root("machine");
        let top = builder.default_region(machine).unwrap();
        let outer = builder.state("outer", top).unwrap();
        builder.initial(top, outer).unwrap();
        let inner_region = builder.region("inner", outer).unwrap();
        let leaf = builder.state("leaf", inner_region).unwrap();
        builder.initial(inner_region, leaf).unwrap();
        let model = builder.build().unwrap();

        assert_eq!(
            model.ancestors(leaf),
            Some(vec![
                Node::Vertex(machine),
                Node::Region(top),
                Node::Vertex(outer),
                Node::Region(inner_region),
                Node::Vertex(leaf),
            ])
        );
        assert_eq!(model.root_of(leaf), Some(machine));
        assert_eq!(model.owner_of(leaf), Some(outer));
        assert!(model.contains(outer, leaf));
        assert!(!model.contains(leaf, outer));
    }

    #[test]
    fn find_and_roots() {
        let mut builder: ModelBuilder<()> = ModelBuilder::new();
        let first = builder.root("first");
        let second = builder.root("second");
        let model = builder.build().unwrap();

        assert_eq!(model.roots(), vec![first, second]);
        assert_eq!(model.find("second"), Some(second));
        assert_eq!(model.find("missing"), None);
        assert_eq!(model.default_region(first), None);
    }

    #[test]
    fn navigation_rejects_ids_from_a_larger_model() {
        let mut small: ModelBuilder<()> = ModelBuilder::new();
        let only = small.root("only");
        let small = small.build().unwrap();

        let mut large: ModelBuilder<()> = ModelBuilder::new();
        let machine = large.root("machine");
        let top = large.default_region(machine).unwrap();
        let nested = large.state("nested", top).unwrap();
        large.initial(top, nested).unwrap();
        let foreign = large.state("foreign", top).unwrap();

        assert_eq!(small.ancestors(foreign), None);
        assert_eq!(small.root_of(foreign), None);
        assert!(!small.contains(only, foreign));
        assert!(!small.contains(foreign, only));
        assert_eq!(small.owner_of(foreign), None);
        assert!(small.vertex(foreign).is_none());
    }
}
