use crate::composite::compose_all;
use crate::error::{FrameGraphError, FrameResult};
use crate::factory::FactoryRef;
use crate::frames::FrameRef;
use crate::graph::FrameEdge;
use log::{debug, trace};
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// The cheapest chain of factories found between two frames.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    frames: Vec<FrameRef>,
    factories: Vec<FactoryRef>,
    cost: f64,
}

impl ResolvedPath {
    /// Frames visited, both endpoints included.
    pub fn frames(&self) -> &[FrameRef] {
        &self.frames
    }

    pub fn factories(&self) -> &[FactoryRef] {
        &self.factories
    }

    /// Sum of the edge weights along the path.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn hops(&self) -> usize {
        self.factories.len()
    }

    /// True when origin and destination are the same frame.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Single factory performing the whole chain.
    pub fn into_factory(self) -> FactoryRef {
        compose_all(&self.factories)
    }
}

/// Lowest-cost search over the frame graph.
///
/// Holds no state of its own; every call allocates what it needs.
pub(crate) struct PathResolver<'a> {
    graph: &'a DiGraph<FrameRef, FrameEdge>,
}

impl<'a> PathResolver<'a> {
    pub(crate) fn new(graph: &'a DiGraph<FrameRef, FrameEdge>) -> Self {
        Self { graph }
    }

    pub(crate) fn resolve(&self, from: NodeIndex, to: NodeIndex) -> FrameResult<ResolvedPath> {
        if from == to {
            trace!("Identity path on {}", self.graph[from]);
            return Ok(ResolvedPath {
                frames: vec![self.graph[from].clone()],
                factories: Vec::new(),
                cost: 0.0,
            });
        }

        // Dijkstra: A* without a heuristic.
        let (cost, nodes) = astar(
            self.graph,
            from,
            |node| node == to,
            |edge| edge.weight().cost,
            |_| 0.0,
        )
        .ok_or_else(|| self.no_path(from, to))?;

        let mut factories = Vec::with_capacity(nodes.len().saturating_sub(1));
        for hop in nodes.windows(2) {
            let edge = self
                .graph
                .find_edge(hop[0], hop[1])
                .ok_or_else(|| self.no_path(from, to))?;
            factories.push(self.graph[edge].factory.clone());
        }

        debug!(
            "Resolved {} -> {} in {} hop(s) with cost {}",
            self.graph[from],
            self.graph[to],
            factories.len(),
            cost
        );

        Ok(ResolvedPath {
            frames: nodes.iter().map(|&n| self.graph[n].clone()).collect(),
            factories,
            cost,
        })
    }

    fn no_path(&self, from: NodeIndex, to: NodeIndex) -> FrameGraphError {
        FrameGraphError::NoTransformPath {
            from: self.graph[from].name().to_string(),
            to: self.graph[to].name().to_string(),
        }
    }
}
