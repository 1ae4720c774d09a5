//! The `Bush` struct, its construction, and read-only accessors.

use std::fmt;

use tracing::{debug, warn};

use ta_core::{Demand, EquilibriumConfig, NodeId, Origin, TaError};
use ta_network::{Dijkstra, Network, ShortestPaths};

use crate::{BushEdge, BushResult};

/// An in-edge of `node`, at position `slot` of its in-edge list, whose
/// direction disagrees with the current max-distance ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingChange {
    pub node: NodeId,
    pub slot: u32,
}

/// Acyclic, origin-rooted sub-network carrying one origin's demand.
///
/// # Per-bush node state
///
/// Distances and predecessors live in vectors owned by the bush, indexed by
/// `NodeId`.  Several bushes can therefore share one [`Network`]; each only
/// adds to or subtracts from the network's arc flows.
///
/// # Lifecycle
///
/// 1. [`Bush::new`] builds the topology from a shortest-path order and loads
///    all demand onto the cheapest paths (all-or-nothing).
/// 2. The driver calls [`Bush::fix`] once per outer iteration and reads
///    [`Bush::max_difference`] to decide when to stop.
///
/// All per-node vectors are sized to the network at construction and reused.
pub struct Bush {
    pub(crate) origin: Origin,
    pub(crate) config: EquilibriumConfig,

    /// Demands whose destination is reachable and differs from the source.
    pub(crate) demands: Vec<Demand>,
    pub(crate) unreachable: Vec<NodeId>,

    /// In-edges of each node, indexed by `NodeId`.
    pub(crate) in_edges: Vec<Vec<BushEdge>>,
    /// Reachable nodes, origin first, every edge pointing forward.
    pub(crate) order: Vec<NodeId>,

    pub(crate) min_dist: Vec<f64>,
    pub(crate) max_dist: Vec<f64>,
    /// Slot of the in-edge realising `min_dist`.
    pub(crate) min_pred: Vec<Option<u32>>,
    /// Slot of the used in-edge realising `max_dist`; `None` if no in-edge
    /// carries flow.
    pub(crate) max_pred: Vec<Option<u32>>,

    pub(crate) pending: Vec<PendingChange>,
    /// Edges removed from the bush that had no reverse arc to turn into.
    pub(crate) dormant: Vec<BushEdge>,

    /// Min-path marks for the per-destination step: `(epoch, step)`.
    pub(crate) path_mark: Vec<(u32, u32)>,
    pub(crate) mark_epoch: u32,
    /// Path buffers for the per-destination step, reused across calls.
    pub(crate) min_path_buf: Vec<EdgeRef>,
    pub(crate) max_segment_buf: Vec<EdgeRef>,
}

/// One bush edge addressed by head node and in-edge slot.
pub(crate) type EdgeRef = (NodeId, u32);

impl Bush {
    /// Build a bush for `origin` using Dijkstra on the network's current
    /// lengths, then load all demand onto the cheapest paths.
    pub fn new(origin: Origin, network: &mut Network, config: EquilibriumConfig) -> BushResult<Self> {
        Self::with_oracle(origin, network, config, &Dijkstra)
    }

    /// Like [`Bush::new`] with a custom shortest-path oracle.
    ///
    /// Fails if the source or a destination is not a node of `network`, or if
    /// `config` is invalid.  Unreachable destinations are not an error: they
    /// are logged, listed by [`unreachable_destinations`](Self::unreachable_destinations)
    /// and left out of every tree computation.
    pub fn with_oracle<S: ShortestPaths>(
        origin:  Origin,
        network: &mut Network,
        config:  EquilibriumConfig,
        oracle:  &S,
    ) -> BushResult<Self> {
        config.validate()?;
        let n = network.node_count();
        let source = origin.source();
        for node in std::iter::once(source).chain(origin.demands().iter().map(|d| d.destination)) {
            if !node.in_range(n) {
                return Err(TaError::NodeOutOfRange { node, node_count: n }.into());
            }
        }

        let sp = oracle.order_from(network, source)?;

        let mut unreachable = Vec::new();
        let mut demands = Vec::with_capacity(origin.demands().len());
        for d in origin.demands() {
            if !sp.is_reachable(d.destination) {
                warn!(origin = %source, destination = %d.destination, demand = d.amount,
                      "unreachable destination");
                unreachable.push(d.destination);
            } else if d.destination != source {
                demands.push(*d);
            }
        }

        // An arc joins the bush iff it points forward in the shortest-path order.
        let mut in_edges: Vec<Vec<BushEdge>> = vec![Vec::new(); n];
        for edge in network.arcs() {
            let from = network.tail(edge);
            let to = network.head(edge);
            match (sp.position[from.index()], sp.position[to.index()]) {
                (Some(pf), Some(pt)) if pf < pt => in_edges[to.index()].push(BushEdge::new(network, edge)),
                _ => {}
            }
        }

        let mut bush = Self {
            origin,
            config,
            demands,
            unreachable,
            in_edges,
            order: sp.order,
            min_dist: vec![f64::INFINITY; n],
            max_dist: vec![f64::INFINITY; n],
            min_pred: vec![None; n],
            max_pred: vec![None; n],
            pending: Vec::new(),
            dormant: Vec::new(),
            path_mark: vec![(0, 0); n],
            mark_epoch: 0,
            min_path_buf: Vec::with_capacity(n),
            max_segment_buf: Vec::with_capacity(n),
        };

        bush.refresh(network);
        bush.send_initial_flows(network);
        bush.pending.clear();

        debug!(origin = %source, nodes = bush.order.len(), edges = bush.edge_count(),
               "bush constructed");
        Ok(bush)
    }

    /// All-or-nothing loading along the min-predecessor tree.
    fn send_initial_flows(&mut self, network: &mut Network) {
        let root = self.origin.source();
        for d in &self.demands {
            let mut node = d.destination;
            while node != root {
                let Some(slot) = self.min_pred[node.index()] else { break };
                let e = &mut self.in_edges[node.index()][slot as usize];
                e.flow += d.amount;
                network.add_flow(e.edge, d.amount);
                node = e.from;
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn config(&self) -> &EquilibriumConfig {
        &self.config
    }

    /// Destinations that could not be reached at construction, in demand order.
    pub fn unreachable_destinations(&self) -> &[NodeId] {
        &self.unreachable
    }

    /// In-edges of `node`.  Panics if `node` is out of range.
    pub fn in_edges(&self, node: NodeId) -> &[BushEdge] {
        &self.in_edges[node.index()]
    }

    /// Iterator over every edge currently in the bush.
    pub fn edges(&self) -> impl Iterator<Item = &BushEdge> + '_ {
        self.in_edges.iter().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.in_edges.iter().map(Vec::len).sum()
    }

    /// Reachable nodes in the current topological order (origin first).
    pub fn topological_order(&self) -> &[NodeId] {
        &self.order
    }

    /// `true` if `node` was reachable from the origin at construction.
    pub fn contains(&self, node: NodeId) -> bool {
        self.min_dist[node.index()].is_finite()
    }

    /// Min distance from the origin as of the last refresh.
    pub fn min_dist(&self, node: NodeId) -> f64 {
        self.min_dist[node.index()]
    }

    /// Max distance over used edges as of the last refresh.
    pub fn max_dist(&self, node: NodeId) -> f64 {
        self.max_dist[node.index()]
    }

    /// `max_dist − min_dist` for a node with a used in-edge, otherwise zero.
    pub fn difference(&self, node: NodeId) -> f64 {
        let i = node.index();
        if self.max_pred[i].is_some() {
            self.max_dist[i] - self.min_dist[i]
        } else {
            0.0
        }
    }

    /// The in-edge realising `min_dist(node)`, if any.
    pub fn min_predecessor(&self, node: NodeId) -> Option<&BushEdge> {
        self.min_pred[node.index()].map(|slot| &self.in_edges[node.index()][slot as usize])
    }

    /// Edges flagged for reversal by the last refresh.
    pub fn pending_changes(&self) -> &[PendingChange] {
        &self.pending
    }

    /// Edges parked outside the bush because they could not be reversed.
    pub fn dormant_edges(&self) -> &[BushEdge] {
        &self.dormant
    }

    pub fn total_flow_into(&self, node: NodeId) -> f64 {
        self.in_edges[node.index()].iter().map(|e| e.flow).sum()
    }

    pub fn total_flow_out_of(&self, node: NodeId) -> f64 {
        self.edges().filter(|e| e.from == node).map(|e| e.flow).sum()
    }

    /// Render in-edges (with current lengths) and the ordering for debugging.
    pub fn describe<'a>(&'a self, network: &'a Network) -> BushDump<'a> {
        BushDump { bush: self, network }
    }
}

/// `Display` adapter returned by [`Bush::describe`].
pub struct BushDump<'a> {
    bush:    &'a Bush,
    network: &'a Network,
}

impl fmt::Display for BushDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bush = self.bush;
        writeln!(f, "in-edges:")?;
        for (i, edges) in bush.in_edges.iter().enumerate() {
            if edges.is_empty() {
                continue;
            }
            write!(f, "  {i} ({}, {}):", bush.min_dist[i], bush.max_dist[i])?;
            for e in edges {
                write!(f, " {}(len {}, flow {})", e.from.0, e.length(self.network), e.flow)?;
            }
            writeln!(f)?;
        }
        write!(f, "order:")?;
        for node in &bush.order {
            write!(f, " {}", node.0)?;
        }
        Ok(())
    }
}
