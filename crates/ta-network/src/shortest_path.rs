//! Single-source shortest-path ordering.
//!
//! # Pluggability
//!
//! Bush construction asks a [`ShortestPaths`] implementation for the order in
//! which nodes are settled from the origin.  The default [`Dijkstra`] uses the
//! network's current arc lengths, so building a bush on a loaded network
//! starts from congested costs.
//!
//! # Topological guarantee
//!
//! Settle order is non-decreasing in distance, so every arc `u→v` with
//! `position[u] < position[v]` points "forward".  Keeping only those arcs
//! yields an acyclic sub-network even when zero-length arcs create ties.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ta_core::NodeId;

use crate::{Network, NetworkResult};

// ── ShortestPathOrder ─────────────────────────────────────────────────────────

/// Result of a single-source shortest-path query.
#[derive(Debug, Clone)]
pub struct ShortestPathOrder {
    /// `position[v]` is `v`'s index in `order`, or `None` if unreachable.
    pub position: Vec<Option<u32>>,
    /// Reachable nodes in settle order; the source is always first.
    pub order: Vec<NodeId>,
    /// Shortest distance from the source; `f64::INFINITY` if unreachable.
    pub distance: Vec<f64>,
}

impl ShortestPathOrder {
    #[inline]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.position[node.index()].is_some()
    }
}

// ── ShortestPaths trait ───────────────────────────────────────────────────────

/// Pluggable single-source shortest-path oracle.
pub trait ShortestPaths {
    /// Settle every node reachable from `source` over the whole network.
    ///
    /// Fails only if `source` is not a node of `network`.
    fn order_from(&self, network: &Network, source: NodeId) -> NetworkResult<ShortestPathOrder>;
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR graph using current arc lengths.
///
/// Ties on distance are broken by ascending `NodeId`, so results are
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl ShortestPaths for Dijkstra {
    fn order_from(&self, network: &Network, source: NodeId) -> NetworkResult<ShortestPathOrder> {
        network.check_node(source)?;
        Ok(dijkstra(network, source))
    }
}

/// Non-negative `f64` distance with a total order for the heap.
#[derive(Clone, Copy, PartialEq)]
struct Dist(f64);

impl Eq for Dist {}

impl PartialOrd for Dist {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dist {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(network: &Network, source: NodeId) -> ShortestPathOrder {
    let n = network.node_count();
    let mut distance = vec![f64::INFINITY; n];
    let mut position: Vec<Option<u32>> = vec![None; n];
    let mut order = Vec::with_capacity(n);

    distance[source.index()] = 0.0;

    // Min-heap via Reverse; NodeId as secondary key for deterministic ties.
    let mut heap: BinaryHeap<Reverse<(Dist, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Dist(0.0), source)));

    while let Some(Reverse((Dist(cost), node))) = heap.pop() {
        // Skip stale heap entries and nodes already settled at this cost.
        if position[node.index()].is_some() || cost > distance[node.index()] {
            continue;
        }
        position[node.index()] = Some(order.len() as u32);
        order.push(node);

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            if position[neighbor.index()].is_some() {
                continue;
            }
            let new_cost = cost + network.length(edge);
            if new_cost < distance[neighbor.index()] {
                distance[neighbor.index()] = new_cost;
                heap.push(Reverse((Dist(new_cost), neighbor)));
            }
        }
    }

    ShortestPathOrder { position, order, distance }
}
