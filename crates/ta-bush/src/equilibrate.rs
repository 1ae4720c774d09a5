//! Flow shifting between max-cost and min-cost path segments.

use tracing::debug;

use ta_core::NodeId;
use ta_network::Network;

use crate::bush::EdgeRef;
use crate::Bush;

impl Bush {
    /// Shift flow until every reachable destination's gap is within
    /// `accuracy` or no further move is possible.
    ///
    /// Each pass scans the destinations in demand order and equilibrates
    /// those above `accuracy`; trees are rebuilt after every pass that moved
    /// flow.  Returns `true` if any flow moved.  On return the trees reflect
    /// the current flows.
    pub fn equilibrate_flows(&mut self, network: &mut Network, accuracy: f64) -> bool {
        self.refresh(network);
        let mut changed = false;

        for _ in 0..self.config.max_equilibration_passes {
            let mut this_pass = false;
            for i in 0..self.demands.len() {
                let dest = self.demands[i].destination;
                if self.difference(dest) > accuracy {
                    this_pass |= self.equilibrate_node(network, dest);
                }
            }
            if !this_pass {
                return changed;
            }
            changed = true;
            self.refresh(network);
        }

        debug!(origin = %self.origin.source(), passes = self.config.max_equilibration_passes,
               gap = self.current_gap(), "equilibration pass limit reached");
        changed
    }

    /// Move flow from `dest`'s max path onto its min path.
    ///
    /// Both paths are walked back from `dest`.  Every stretch between two
    /// consecutive nodes they share is an independent pair of segments; for
    /// each pair with a positive cost difference, the shift is the Newton
    /// step `gap / Σ derivative`, capped by the smallest flow on the max
    /// segment.  Returns `true` if any flow moved.
    pub(crate) fn equilibrate_node(&mut self, network: &mut Network, dest: NodeId) -> bool {
        let mut min_path = std::mem::take(&mut self.min_path_buf);
        let mut max_segment = std::mem::take(&mut self.max_segment_buf);
        min_path.clear();
        max_segment.clear();

        let moved = self.walk_and_shift(network, dest, &mut min_path, &mut max_segment);

        self.min_path_buf = min_path;
        self.max_segment_buf = max_segment;
        moved
    }

    fn walk_and_shift(
        &mut self,
        network:     &mut Network,
        dest:        NodeId,
        min_path:    &mut Vec<EdgeRef>,
        max_segment: &mut Vec<EdgeRef>,
    ) -> bool {
        let root = self.origin.source();
        self.mark_epoch = self.mark_epoch.wrapping_add(1);
        if self.mark_epoch == 0 {
            self.path_mark.iter_mut().for_each(|m| *m = (0, 0));
            self.mark_epoch = 1;
        }
        let epoch = self.mark_epoch;

        // Min path from dest back to the root; min_path[k] enters the k-th node.
        let mut node = dest;
        self.path_mark[node.index()] = (epoch, 0);
        while node != root {
            let Some(slot) = self.min_pred[node.index()] else { return false };
            min_path.push((node, slot));
            node = self.in_edges[node.index()][slot as usize].from;
            self.path_mark[node.index()] = (epoch, min_path.len() as u32);
        }

        let mut moved = false;
        let mut last_common = 0u32;
        let mut node = dest;
        while node != root {
            let i = node.index();
            let Some(slot) = self.max_pred[i].or(self.min_pred[i]) else { break };
            max_segment.push((node, slot));
            node = self.in_edges[i][slot as usize].from;

            let (mark, step) = self.path_mark[node.index()];
            if mark == epoch && step > last_common {
                let min_segment = &min_path[last_common as usize..step as usize];
                if max_segment.as_slice() != min_segment {
                    moved |= self.shift_segment(network, max_segment, min_segment);
                }
                max_segment.clear();
                last_common = step;
            }
        }
        moved
    }

    /// Move flow from `max_segment` to `min_segment`, two edge-disjoint
    /// paths between the same pair of nodes.
    fn shift_segment(&mut self, network: &mut Network, max_segment: &[EdgeRef], min_segment: &[EdgeRef]) -> bool {
        let edge = |&(node, slot): &EdgeRef| self.in_edges[node.index()][slot as usize];

        let max_cost: f64 = max_segment.iter().map(|r| edge(r).length(network)).sum();
        let min_cost: f64 = min_segment.iter().map(|r| edge(r).length(network)).sum();
        let gap = max_cost - min_cost;
        if gap <= 0.0 {
            return false;
        }

        let bottleneck = max_segment
            .iter()
            .map(|r| edge(r).flow)
            .fold(f64::INFINITY, f64::min);
        if bottleneck <= self.config.flow_epsilon {
            return false;
        }

        let slope: f64 = max_segment
            .iter()
            .chain(min_segment)
            .map(|r| network.derivative(edge(r).edge))
            .sum();
        let delta = if slope > 0.0 { (gap / slope).min(bottleneck) } else { bottleneck };
        if delta <= 0.0 {
            return false;
        }

        for &(node, slot) in max_segment {
            let e = &mut self.in_edges[node.index()][slot as usize];
            e.flow = (e.flow - delta).max(0.0);
            network.add_flow(e.edge, -delta);
        }
        for &(node, slot) in min_segment {
            let e = &mut self.in_edges[node.index()][slot as usize];
            e.flow += delta;
            network.add_flow(e.edge, delta);
        }
        true
    }

    /// Largest destination gap as of the last refresh.
    pub(crate) fn current_gap(&self) -> f64 {
        self.demands
            .iter()
            .map(|d| self.difference(d.destination))
            .fold(0.0, f64::max)
    }
}
