//! Min/max distance trees over the bush.

use ta_network::Network;

use crate::{Bush, PendingChange};

impl Bush {
    /// Recompute min/max distances and predecessors for every reachable node
    /// and collect the edges whose direction has gone stale.
    ///
    /// Nodes are visited in topological order, so each node's in-edge tails
    /// are final before the node is processed.  For node `v`:
    ///
    /// - `min_dist(v)` is the cheapest `min_dist(u) + len` over all in-edges;
    /// - `max_dist(v)` is the costliest `max_dist(u) + len` over **used**
    ///   in-edges, or over all in-edges when none carries flow;
    /// - an unused in-edge whose tail has a strictly larger `max_dist` than
    ///   `v` is flagged in [`pending_changes`](Self::pending_changes).
    ///
    /// Used edges are never flagged, so reversing flagged edges never strands
    /// flow.  Ties are left alone: the stable re-sort keeps their order.
    /// Consequently `max_dist(u) < max_dist(v)` holds strictly for used edges
    /// with positive length; an unused edge may end with
    /// `max_dist(u) == max_dist(v)`, whatever its length.
    ///
    /// Calling this twice without changing flows or topology yields identical
    /// state.  The query methods ([`max_difference`](Self::max_difference),
    /// [`all_or_nothing_cost`](Self::all_or_nothing_cost),
    /// [`give_count`](Self::give_count)) always call it first.
    pub fn refresh(&mut self, network: &Network) {
        self.pending.clear();
        let eps = self.config.flow_epsilon;

        let root = self.origin.source().index();
        self.min_dist[root] = 0.0;
        self.max_dist[root] = 0.0;
        self.min_pred[root] = None;
        self.max_pred[root] = None;

        for pos in 1..self.order.len() {
            let v = self.order[pos];
            let vi = v.index();
            let edges = &self.in_edges[vi];

            let mut min = f64::INFINITY;
            let mut min_slot = None;
            let mut used_max = f64::NEG_INFINITY;
            let mut max_slot = None;
            let mut any_max = f64::NEG_INFINITY;

            for (slot, e) in edges.iter().enumerate() {
                let len = network.length(e.edge);
                let via_min = self.min_dist[e.from.index()] + len;
                if via_min < min {
                    min = via_min;
                    min_slot = Some(slot as u32);
                }
                let via_max = self.max_dist[e.from.index()] + len;
                if e.is_used(eps) && via_max > used_max {
                    used_max = via_max;
                    max_slot = Some(slot as u32);
                }
                any_max = any_max.max(via_max);
            }

            let max = if max_slot.is_some() {
                used_max
            } else if edges.is_empty() {
                f64::INFINITY
            } else {
                any_max
            };

            self.min_dist[vi] = min;
            self.max_dist[vi] = max;
            self.min_pred[vi] = min_slot;
            self.max_pred[vi] = max_slot;

            for (slot, e) in edges.iter().enumerate() {
                if !e.is_used(eps) && self.max_dist[e.from.index()] > max {
                    self.pending.push(PendingChange { node: v, slot: slot as u32 });
                }
            }
        }
    }
}
