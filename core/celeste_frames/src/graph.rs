//! The frame graph: reference frames as vertices, transform factories as
//! directed edges weighted by their cost.
//!
//! Building and querying are split. [`FrameGraphBuilder`] owns every mutation;
//! [`FrameGraphBuilder::freeze`] hands back an immutable [`FrameGraph`] that can
//! be shared across threads and answers transform requests.

use crate::epoch::Epoch;
use crate::error::{FrameGraphError, FrameResult, FrameSide};
use crate::factory::{FactoryRef, TransformFactory, TransformFactoryExt, INVERSE_COST_OVERHEAD};
use crate::frames::{FrameRef, ReferenceFrame};
use crate::inverse::InverseFactory;
use crate::resolver::{PathResolver, ResolvedPath};
use crate::transform::Transform;
use log::{debug, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::sync::Arc;

/// Knobs applied while the graph is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphSettings {
    /// Epoch at which edge costs are evaluated.
    pub reference_epoch: Epoch,
    /// Extra cost of the generic inverses added by
    /// [`FrameGraphBuilder::attach_transform_pair`].
    pub inverse_cost_overhead: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            reference_epoch: Epoch::J2000,
            inverse_cost_overhead: INVERSE_COST_OVERHEAD,
        }
    }
}

/// Stable handle of an attached frame. Frames are never removed, so a handle
/// stays valid for the life of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(NodeIndex);

impl FrameHandle {
    pub fn index(&self) -> usize {
        self.0.index()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FrameEdge {
    pub(crate) factory: FactoryRef,
    pub(crate) cost: f64,
}

/// One attached factory seen from the graph.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub source: &'a FrameRef,
    pub target: &'a FrameRef,
    pub factory: &'a FactoryRef,
    pub cost: f64,
}

/// Frame identity is the address of the shared frame; the graph holds a clone
/// of every `Arc` it indexes so the address cannot be reused.
fn frame_key(frame: &FrameRef) -> usize {
    Arc::as_ptr(frame) as usize
}

#[derive(Debug, Default)]
struct Topology {
    graph: DiGraph<FrameRef, FrameEdge>,
    frame_indices: HashMap<usize, NodeIndex>,
}

impl Topology {
    fn node_of(&self, frame: &FrameRef) -> Option<NodeIndex> {
        self.frame_indices.get(&frame_key(frame)).copied()
    }

    /// First frame in insertion order accepted by `selector`.
    fn select<S>(&self, selector: S) -> Option<NodeIndex>
    where
        S: Fn(&ReferenceFrame) -> bool,
    {
        self.graph
            .node_indices()
            .find(|&node| selector(self.graph[node].as_ref()))
    }

    fn frames(&self) -> impl Iterator<Item = &FrameRef> + '_ {
        self.graph.node_indices().map(move |node| &self.graph[node])
    }

    fn touching(&self, node: Option<NodeIndex>) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        let graph = &self.graph;
        node.into_iter()
            .flat_map(move |node| {
                let outgoing = graph.edges_directed(node, Direction::Outgoing);
                // A self-loop already showed up as outgoing.
                let incoming = graph
                    .edges_directed(node, Direction::Incoming)
                    .filter(|edge| edge.source() != edge.target());
                outgoing.chain(incoming)
            })
            .map(move |edge| EdgeView {
                source: &graph[edge.source()],
                target: &graph[edge.target()],
                factory: &edge.weight().factory,
                cost: edge.weight().cost,
            })
    }

    fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        let graph = &self.graph;
        graph.edge_references().map(move |edge| EdgeView {
            source: &graph[edge.source()],
            target: &graph[edge.target()],
            factory: &edge.weight().factory,
            cost: edge.weight().cost,
        })
    }
}

/// Mutable side of the frame graph.
#[derive(Debug, Default)]
pub struct FrameGraphBuilder {
    settings: GraphSettings,
    topology: Topology,
}

impl FrameGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: GraphSettings) -> Self {
        Self {
            settings,
            topology: Topology::default(),
        }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Adds `frame` as a vertex. Attaching the same instance again returns the
    /// handle it already has.
    pub fn attach_frame(&mut self, frame: &FrameRef) -> FrameHandle {
        let key = frame_key(frame);
        if let Some(&node) = self.topology.frame_indices.get(&key) {
            return FrameHandle(node);
        }
        let node = self.topology.graph.add_node(frame.clone());
        self.topology.frame_indices.insert(key, node);
        debug!("Attached frame {} as #{}", frame, node.index());
        FrameHandle(node)
    }

    /// Attaches `factory` as the edge `source` → `destination`, replacing any
    /// factory already there.
    ///
    /// Returns false, and leaves the graph untouched, when either frame has not
    /// been attached.
    pub fn attach_transform(
        &mut self,
        source: &FrameRef,
        destination: &FrameRef,
        factory: FactoryRef,
    ) -> bool {
        let (Some(from), Some(to)) = (
            self.topology.node_of(source),
            self.topology.node_of(destination),
        ) else {
            warn!(
                "Ignoring {} between {} and {}: both frames must be attached first",
                factory.name(),
                source,
                destination
            );
            return false;
        };

        let cost = sanitize_cost(factory.cost(&self.settings.reference_epoch), &factory);
        debug!(
            "Attached {} from {} to {} with cost {}",
            factory.name(),
            source,
            destination,
            cost
        );
        self.topology
            .graph
            .update_edge(from, to, FrameEdge { factory, cost });
        true
    }

    /// Attaches `factory` and, unless the reverse edge already exists, its
    /// generic inverse.
    pub fn attach_transform_pair(
        &mut self,
        source: &FrameRef,
        destination: &FrameRef,
        factory: FactoryRef,
    ) -> bool {
        let inverse: FactoryRef = match factory.inverted() {
            Some(original) => original.clone(),
            None => Arc::new(InverseFactory::with_overhead(
                factory.clone(),
                self.settings.inverse_cost_overhead,
            )),
        };
        if !self.attach_transform(source, destination, factory) {
            return false;
        }
        if self.has_edge(destination, source) {
            debug!(
                "Keeping existing factory from {} to {}",
                destination, source
            );
            return true;
        }
        self.attach_transform(destination, source, inverse)
    }

    pub fn find_frame<S>(&self, selector: S) -> Option<FrameRef>
    where
        S: Fn(&ReferenceFrame) -> bool,
    {
        self.topology
            .select(selector)
            .map(|node| self.topology.graph[node].clone())
    }

    pub fn contains_frame(&self, frame: &FrameRef) -> bool {
        self.topology.node_of(frame).is_some()
    }

    fn has_edge(&self, source: &FrameRef, destination: &FrameRef) -> bool {
        match (
            self.topology.node_of(source),
            self.topology.node_of(destination),
        ) {
            (Some(from), Some(to)) => self.topology.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Ends the build phase.
    pub fn freeze(self) -> FrameGraph {
        debug!(
            "Frame graph frozen with {} frame(s) and {} factory edge(s)",
            self.topology.graph.node_count(),
            self.topology.graph.edge_count()
        );
        FrameGraph {
            settings: self.settings,
            topology: self.topology,
        }
    }
}

fn sanitize_cost(cost: f64, factory: &FactoryRef) -> f64 {
    if cost.is_nan() {
        warn!("{} reported a NaN cost, it will only be used as a last resort", factory.name());
        f64::INFINITY
    } else if cost < 0.0 {
        warn!("{} reported a negative cost {}, clamping to zero", factory.name(), cost);
        0.0
    } else {
        cost
    }
}

/// Immutable, thread-safe frame graph answering transform requests.
#[derive(Debug)]
pub struct FrameGraph {
    settings: GraphSettings,
    topology: Topology,
}

impl FrameGraph {
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn frame_count(&self) -> usize {
        self.topology.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.graph.edge_count()
    }

    /// First attached frame, in insertion order, accepted by `selector`.
    pub fn find_frame<S>(&self, selector: S) -> Option<FrameRef>
    where
        S: Fn(&ReferenceFrame) -> bool,
    {
        self.topology
            .select(selector)
            .map(|node| self.topology.graph[node].clone())
    }

    pub fn handle_of(&self, frame: &FrameRef) -> Option<FrameHandle> {
        self.topology.node_of(frame).map(FrameHandle)
    }

    /// All attached frames in insertion order.
    pub fn all_frames(&self) -> impl Iterator<Item = &FrameRef> + '_ {
        self.topology.frames()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.topology.edges()
    }

    /// Every edge leaving or reaching `frame`. Empty when the frame is not
    /// attached; call again to walk the edges again.
    pub fn factories_touching(&self, frame: &FrameRef) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.topology.touching(self.topology.node_of(frame))
    }

    pub fn factories_touching_by<S>(&self, selector: S) -> impl Iterator<Item = EdgeView<'_>> + '_
    where
        S: Fn(&ReferenceFrame) -> bool,
    {
        self.topology.touching(self.topology.select(selector))
    }

    pub fn resolve_path(&self, from: &FrameRef, to: &FrameRef) -> FrameResult<ResolvedPath> {
        let from = self
            .topology
            .node_of(from)
            .ok_or(FrameGraphError::FrameNotFound {
                side: FrameSide::Origin,
            })?;
        let to = self
            .topology
            .node_of(to)
            .ok_or(FrameGraphError::FrameNotFound {
                side: FrameSide::Destination,
            })?;
        PathResolver::new(&self.topology.graph).resolve(from, to)
    }

    pub fn resolve_path_by<F, T>(&self, from: F, to: T) -> FrameResult<ResolvedPath>
    where
        F: Fn(&ReferenceFrame) -> bool,
        T: Fn(&ReferenceFrame) -> bool,
    {
        let from = self
            .topology
            .select(from)
            .ok_or(FrameGraphError::FrameNotFound {
                side: FrameSide::Origin,
            })?;
        let to = self
            .topology
            .select(to)
            .ok_or(FrameGraphError::FrameNotFound {
                side: FrameSide::Destination,
            })?;
        PathResolver::new(&self.topology.graph).resolve(from, to)
    }

    /// Single factory transforming from `from` to `to`, chaining as many
    /// attached factories as the cheapest path needs.
    pub fn get_transform_factory(&self, from: &FrameRef, to: &FrameRef) -> FrameResult<FactoryRef> {
        Ok(self.resolve_path(from, to)?.into_factory())
    }

    pub fn get_transform_factory_by<F, T>(&self, from: F, to: T) -> FrameResult<FactoryRef>
    where
        F: Fn(&ReferenceFrame) -> bool,
        T: Fn(&ReferenceFrame) -> bool,
    {
        Ok(self.resolve_path_by(from, to)?.into_factory())
    }

    pub fn get_transform(
        &self,
        from: &FrameRef,
        to: &FrameRef,
        epoch: &Epoch,
    ) -> FrameResult<Transform> {
        Ok(self.get_transform_factory(from, to)?.transform(epoch))
    }

    pub fn get_transform_by<F, T>(&self, from: F, to: T, epoch: &Epoch) -> FrameResult<Transform>
    where
        F: Fn(&ReferenceFrame) -> bool,
        T: Fn(&ReferenceFrame) -> bool,
    {
        Ok(self.get_transform_factory_by(from, to)?.transform(epoch))
    }
}
