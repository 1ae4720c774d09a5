//! Network representation and builder.
//!
//! # Data layout
//!
//! Arcs are stored in **Compressed Sparse Row (CSR)** format.  Given a
//! `NodeId n`, its outgoing arcs are the `EdgeId`s
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All arc arrays (`edge_from`, `edge_to`, `edge_cost`, `edge_reverse`, and
//! the private flow/length arrays) are sorted by source node and indexed by
//! `EdgeId`.
//!
//! # Reverse arcs
//!
//! A two-way road is two arcs.  `edge_reverse[e]` links each arc to the
//! opposite-direction arc between the same endpoints, if one exists.  Bushes
//! use it to turn an edge around without touching network structure.

use rustc_hash::FxHashMap;

use ta_core::{EdgeId, NodeId};

use crate::{CostFunction, NetworkError, NetworkResult};

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed network in CSR format with per-arc flow and cached length.
///
/// Structural fields are `pub` for direct indexed access on hot paths.  Flow
/// and length are private so they can only change together through
/// [`add_flow`](Self::add_flow).  Do not construct directly; use
/// [`NetworkBuilder`].
#[derive(Clone, Debug)]
pub struct Network {
    node_count: usize,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Arc data (indexed by EdgeId) ──────────────────────────────────────
    /// Tail node of each arc.
    pub edge_from: Vec<NodeId>,

    /// Head node of each arc.
    pub edge_to: Vec<NodeId>,

    /// Link performance function of each arc.
    pub edge_cost: Vec<CostFunction>,

    /// Opposite-direction arc between the same endpoints, if any.
    pub edge_reverse: Vec<Option<EdgeId>>,

    /// Total flow on each arc, summed over every bush using it.
    edge_flow: Vec<f64>,

    /// `edge_cost[e].cost(edge_flow[e])`, cached.
    edge_length: Vec<f64>,
}

impl Network {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Fail with [`NetworkError::NodeOutOfRange`] unless `node` belongs to
    /// this network.
    pub fn check_node(&self, node: NodeId) -> NetworkResult<()> {
        if node.in_range(self.node_count) {
            Ok(())
        } else {
            Err(NetworkError::NodeOutOfRange { node, node_count: self.node_count })
        }
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing arcs from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over every arc id in the network.
    #[inline]
    pub fn arcs(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(|i| EdgeId(i as u32))
    }

    /// Tail node of `edge`.
    #[inline]
    pub fn tail(&self, edge: EdgeId) -> NodeId {
        self.edge_from[edge.index()]
    }

    /// Head node of `edge`.
    #[inline]
    pub fn head(&self, edge: EdgeId) -> NodeId {
        self.edge_to[edge.index()]
    }

    /// The opposite-direction arc of `edge`, if the network has one.
    #[inline]
    pub fn reverse(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edge_reverse[edge.index()]
    }

    /// First arc from `from` to `to`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|&e| self.edge_to[e.index()] == to)
    }

    // ── Flow and cost ─────────────────────────────────────────────────────

    #[inline]
    pub fn flow(&self, edge: EdgeId) -> f64 {
        self.edge_flow[edge.index()]
    }

    /// Current cost of traversing `edge`.
    #[inline]
    pub fn length(&self, edge: EdgeId) -> f64 {
        self.edge_length[edge.index()]
    }

    #[inline]
    pub fn cost_function(&self, edge: EdgeId) -> &CostFunction {
        &self.edge_cost[edge.index()]
    }

    /// Slope of `edge`'s cost function at its current flow.
    #[inline]
    pub fn derivative(&self, edge: EdgeId) -> f64 {
        self.edge_cost[edge.index()].derivative(self.edge_flow[edge.index()])
    }

    /// Add `delta` (possibly negative) to `edge`'s flow and re-evaluate its
    /// length.  Round-off below zero is clamped to zero.
    #[inline]
    pub fn add_flow(&mut self, edge: EdgeId, delta: f64) {
        let i = edge.index();
        let flow = (self.edge_flow[i] + delta).max(0.0);
        self.edge_flow[i] = flow;
        self.edge_length[i] = self.edge_cost[i].cost(flow);
    }

    /// Drop all flow and restore free-flow lengths.
    pub fn reset_flows(&mut self) {
        for (i, cost) in self.edge_cost.iter().enumerate() {
            self.edge_flow[i] = 0.0;
            self.edge_length[i] = cost.cost(0.0);
        }
    }

    /// Σ flow × length over all arcs (total system travel cost).
    pub fn total_cost(&self) -> f64 {
        self.edge_flow
            .iter()
            .zip(&self.edge_length)
            .map(|(f, l)| f * l)
            .sum()
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// Nodes are numbered from 0 in creation order.  Arcs may be added in any
/// order; `build()` sorts them by tail node (stably, so arcs leaving the same
/// node keep insertion order), builds the CSR arrays and pairs reverse arcs.
///
/// # Example
///
/// ```
/// use ta_network::{CostFunction, NetworkBuilder};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node();
/// let c = b.add_node();
/// b.add_link(a, c, CostFunction::bpr(10.0, 500.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // one arc per direction
/// ```
pub struct NetworkBuilder {
    node_count: usize,
    raw_edges:  Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to:   NodeId,
    cost: CostFunction,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { node_count: 0, raw_edges: Vec::new() }
    }

    /// Start with `nodes` nodes already present and room for `edges` arcs.
    pub fn with_nodes(nodes: usize, edges: usize) -> Self {
        Self { node_count: nodes, raw_edges: Vec::with_capacity(edges) }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count as u32);
        self.node_count += 1;
        id
    }

    /// Add a **directed** arc from `from` to `to`.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, cost: CostFunction) -> &mut Self {
        self.raw_edges.push(RawEdge { from, to, cost });
        self
    }

    /// Convenience: add arcs in **both directions** with the same cost
    /// function.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, cost: CostFunction) -> &mut Self {
        self.add_arc(a, b, cost);
        self.add_arc(b, a, cost)
    }

    pub fn node_count(&self) -> usize { self.node_count }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Network`] with zero flow.
    ///
    /// Fails if an arc references a node that was never added or carries an
    /// invalid cost function.
    pub fn build(self) -> NetworkResult<Network> {
        let node_count = self.node_count;

        for e in &self.raw_edges {
            for node in [e.from, e.to] {
                if !node.in_range(node_count) {
                    return Err(NetworkError::NodeOutOfRange { node, node_count });
                }
            }
            e.cost
                .validate()
                .map_err(|reason| NetworkError::InvalidCost { from: e.from, to: e.to, reason })?;
        }

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId>       = raw.iter().map(|e| e.from).collect();
        let edge_to:   Vec<NodeId>       = raw.iter().map(|e| e.to).collect();
        let edge_cost: Vec<CostFunction> = raw.iter().map(|e| e.cost).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        // First arc per (from, to) pair wins when pairing parallel arcs.
        let mut by_endpoints: FxHashMap<(NodeId, NodeId), EdgeId> = FxHashMap::default();
        for (i, e) in raw.iter().enumerate() {
            by_endpoints.entry((e.from, e.to)).or_insert(EdgeId(i as u32));
        }
        let edge_reverse: Vec<Option<EdgeId>> = raw
            .iter()
            .map(|e| {
                if e.from == e.to {
                    None
                } else {
                    by_endpoints.get(&(e.to, e.from)).copied()
                }
            })
            .collect();

        let edge_flow   = vec![0.0; raw.len()];
        let edge_length = edge_cost.iter().map(|c| c.cost(0.0)).collect();

        Ok(Network {
            node_count,
            node_out_start,
            edge_from,
            edge_to,
            edge_cost,
            edge_reverse,
            edge_flow,
            edge_length,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
