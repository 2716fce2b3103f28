//! Read-only folds over the state tree.

use super::Model;
use crate::core::{Region, RegionId, Vertex, VertexId, VertexKind};

/// A pre-order fold over a model, one method per vertex kind.
///
/// Each method receives the incoming context and returns the outgoing one.
/// A vertex's outgoing context is handed to each of its child regions; within
/// a region the context returned by one vertex is passed on to the next
/// sibling. Every method defaults to passing the context through unchanged.
pub trait Visitor<M> {
    type Context: Clone;

    fn visit_state(
        &mut self,
        _model: &Model<M>,
        _id: VertexId,
        _state: &Vertex,
        context: Self::Context,
    ) -> Self::Context {
        context
    }

    fn visit_final(
        &mut self,
        _model: &Model<M>,
        _id: VertexId,
        _vertex: &Vertex,
        context: Self::Context,
    ) -> Self::Context {
        context
    }

    fn visit_initial(
        &mut self,
        _model: &Model<M>,
        _id: VertexId,
        _vertex: &Vertex,
        context: Self::Context,
    ) -> Self::Context {
        context
    }

    fn visit_region(
        &mut self,
        _model: &Model<M>,
        _id: RegionId,
        _region: &Region,
        context: Self::Context,
    ) -> Self::Context {
        context
    }
}

impl<M> Model<M> {
    /// Fold `visitor` over the subtree rooted at `vertex`.
    ///
    /// Returns the context produced by `vertex` itself, i.e. what a following
    /// sibling would receive. A vertex of another model is not visited and
    /// the context comes back unchanged.
    pub fn accept<V>(&self, vertex: VertexId, visitor: &mut V, context: V::Context) -> V::Context
    where
        V: Visitor<M>,
    {
        let Some(node) = self.vertex(vertex) else {
            return context;
        };
        let context = match node.kind() {
            VertexKind::State => visitor.visit_state(self, vertex, node, context),
            VertexKind::Final => visitor.visit_final(self, vertex, node, context),
            VertexKind::Initial => visitor.visit_initial(self, vertex, node, context),
        };

        for region in node.regions() {
            self.accept_region(*region, visitor, context.clone());
        }

        context
    }

    fn accept_region<V>(&self, region: RegionId, visitor: &mut V, context: V::Context) -> V::Context
    where
        V: Visitor<M>,
    {
        let node = self.r(region);
        let mut context = visitor.visit_region(self, region, node, context);
        for vertex in node.vertices() {
            context = self.accept(*vertex, visitor, context);
        }
        context
    }
}
