//! Edge reversal, topological re-sort, and the `fix` driver.

use tracing::{debug, enabled, trace, Level};

use ta_network::Network;

use crate::{Bush, BushEdge, SortScratch};

/// What one restructuring pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RestructureStats {
    /// Flagged edges replaced by their reverse arc.
    pub reversed: usize,
    /// Flagged edges parked because no usable reverse arc exists.
    pub parked: usize,
    /// Parked edges brought back into the bush.
    pub readmitted: usize,
}

impl RestructureStats {
    pub fn changed(&self) -> bool {
        self.reversed + self.parked + self.readmitted > 0
    }
}

impl Bush {
    /// Equilibrate and restructure until a restructuring pass changes
    /// nothing, or `max_restructure_rounds` is reached.
    ///
    /// Returns `true` if any flow moved.  A `false` return with a large
    /// [`max_difference`](Self::max_difference) means the bush is stuck at
    /// its current topology and accuracy.
    pub fn fix(&mut self, network: &mut Network, scratch: &mut SortScratch, accuracy: f64) -> bool {
        let mut flow_changed = false;
        let mut rounds = 0;
        loop {
            flow_changed |= self.equilibrate_flows(network, accuracy);
            rounds += 1;
            if !self.update_edges(network, scratch).changed() {
                break;
            }
            if rounds >= self.config.max_restructure_rounds {
                debug!(origin = %self.origin.source(), rounds, "restructure round limit reached");
                self.refresh(network);
                break;
            }
        }

        debug!(origin = %self.origin.source(), rounds, flow_changed, "bush fixed");
        if enabled!(Level::TRACE) {
            trace!(origin = %self.origin.source(), "bush state\n{}", self.describe(network));
        }
        flow_changed
    }

    /// [`fix`](Self::fix) at the configured accuracy.
    pub fn fix_default(&mut self, network: &mut Network, scratch: &mut SortScratch) -> bool {
        let accuracy = self.config.accuracy;
        self.fix(network, scratch, accuracy)
    }

    /// Apply the pending reversals from the last refresh, re-admit parked
    /// edges that fit again, and re-sort if anything changed.
    ///
    /// Uses the distances of the last refresh; the trees are stale afterwards
    /// until the next [`refresh`](Self::refresh).
    pub fn update_edges(&mut self, network: &mut Network, scratch: &mut SortScratch) -> RestructureStats {
        let mut stats = RestructureStats::default();
        if !self.pending.is_empty() {
            self.apply_pending_changes(network, &mut stats);
        }
        self.readmit_dormant(&mut stats);

        if stats.changed() {
            self.topological_sort(scratch);
            debug!(origin = %self.origin.source(), reversed = stats.reversed,
                   parked = stats.parked, readmitted = stats.readmitted, "bush restructured");
        }
        stats
    }

    /// Rebuild each affected node's in-edge list from its retained edges and
    /// turn every removed edge around.
    ///
    /// Pending entries are produced in topological order, one contiguous run
    /// per node with ascending slots.  Reversed edges are appended to their
    /// new head's list, which leaves that node's pending slots valid.
    fn apply_pending_changes(&mut self, network: &mut Network, stats: &mut RestructureStats) {
        let mut pending = std::mem::take(&mut self.pending);

        for run in pending.chunk_by(|a, b| a.node == b.node) {
            let node = run[0].node;
            let old = std::mem::take(&mut self.in_edges[node.index()]);
            let mut retained = Vec::with_capacity(old.len().saturating_sub(run.len()));
            let mut removed = Vec::with_capacity(run.len());

            let mut flagged = run.iter().map(|c| c.slot as usize).peekable();
            for (slot, e) in old.into_iter().enumerate() {
                if flagged.next_if_eq(&slot).is_some() {
                    removed.push(e);
                } else {
                    retained.push(e);
                }
            }
            self.in_edges[node.index()] = retained;

            for e in removed {
                self.reverse_or_park(network, e, stats);
            }
        }

        pending.clear();
        self.pending = pending;
    }

    fn reverse_or_park(&mut self, network: &mut Network, mut edge: BushEdge, stats: &mut RestructureStats) {
        // Residual flow below the used threshold is dropped with the edge.
        if edge.flow != 0.0 {
            network.add_flow(edge.edge, -edge.flow);
            edge.flow = 0.0;
        }

        match edge.reversed(network) {
            Some(rev)
                if self.max_dist[rev.from.index()] < self.max_dist[rev.to.index()]
                    && !self.in_edges[rev.to.index()].iter().any(|e| e.edge == rev.edge) =>
            {
                self.in_edges[rev.to.index()].push(rev);
                stats.reversed += 1;
            }
            _ => {
                self.dormant.push(edge);
                stats.parked += 1;
            }
        }
    }

    fn readmit_dormant(&mut self, stats: &mut RestructureStats) {
        let mut i = 0;
        while i < self.dormant.len() {
            let e = self.dormant[i];
            let fits = self.max_dist[e.from.index()] < self.max_dist[e.to.index()]
                && !self.in_edges[e.to.index()].iter().any(|x| x.edge == e.edge);
            if fits {
                self.dormant.swap_remove(i);
                self.in_edges[e.to.index()].push(e);
                stats.readmitted += 1;
            } else {
                i += 1;
            }
        }
    }

    /// Re-sort reachable nodes by `max_dist`, keeping the origin first.
    ///
    /// Every edge left in the bush has `max_dist(tail) <= max_dist(head)`,
    /// strictly for edges added this pass.  The sort is stable, so equal
    /// distances keep their previous relative order, which was already
    /// topological.
    pub(crate) fn topological_sort(&mut self, scratch: &mut SortScratch) {
        let entries = &mut scratch.entries;
        entries.clear();
        entries.extend(self.order[1..].iter().map(|&v| (self.max_dist[v.index()], v)));
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (slot, &(_, v)) in self.order[1..].iter_mut().zip(entries.iter()) {
            *slot = v;
        }
    }
}
