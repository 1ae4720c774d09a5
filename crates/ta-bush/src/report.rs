//! Convergence and cost queries for the assignment driver.
//!
//! Every query that depends on distances refreshes the trees first, so it
//! reflects the network's current costs (including flow added by other
//! bushes since this bush was last fixed).

use ta_network::Network;

use crate::Bush;

impl Bush {
    /// Largest `max_dist − min_dist` over reachable destinations.
    ///
    /// This is the convergence measure: the driver stops iterating once it
    /// falls below its threshold for every bush.
    pub fn max_difference(&mut self, network: &Network) -> f64 {
        self.refresh(network);
        self.current_gap()
    }

    /// Σ demand × cheapest-path cost over reachable destinations, i.e. the
    /// cost if everyone took the current shortest path.
    pub fn all_or_nothing_cost(&mut self, network: &Network) -> f64 {
        self.refresh(network);
        let root = self.origin.source();
        let mut cost = 0.0;
        for d in &self.demands {
            let mut node = d.destination;
            while node != root {
                let Some(slot) = self.min_pred[node.index()] else { break };
                let e = &self.in_edges[node.index()][slot as usize];
                cost += d.amount * e.length(network);
                node = e.from;
            }
        }
        cost
    }

    /// Number of nodes whose `max_dist` equals that of the node just before
    /// them in the topological order.
    ///
    /// A structural diagnostic for distance ties (typically caused by
    /// zero-length arcs).  For the number of loaded edges see
    /// [`used_edge_count`](Self::used_edge_count).
    pub fn give_count(&mut self, network: &Network) -> usize {
        self.refresh(network);
        self.order
            .windows(2)
            .filter(|w| self.max_dist[w[0].index()] == self.max_dist[w[1].index()])
            .count()
    }

    /// Number of bush edges carrying more than `flow_epsilon`.
    pub fn used_edge_count(&self) -> usize {
        let eps = self.config.flow_epsilon;
        self.edges().filter(|e| e.is_used(eps)).count()
    }
}
