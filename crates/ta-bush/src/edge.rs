//! A bush's view of one network arc.

use ta_core::{EdgeId, NodeId};
use ta_network::Network;

/// Directed edge of a bush.
///
/// `flow` is this bush's contribution only; the underlying network arc sums
/// the contributions of every bush that uses it.  The edge's length is always
/// read from the network so all bushes see the same, current cost.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BushEdge {
    pub from: NodeId,
    pub to:   NodeId,
    /// Underlying network arc (`from → to`).
    pub edge: EdgeId,
    pub flow: f64,
}

impl BushEdge {
    /// A zero-flow bush edge over network arc `edge`.
    pub fn new(network: &Network, edge: EdgeId) -> Self {
        Self {
            from: network.tail(edge),
            to:   network.head(edge),
            edge,
            flow: 0.0,
        }
    }

    /// `true` if the edge carries more than `epsilon` flow.
    #[inline]
    pub fn is_used(&self, epsilon: f64) -> bool {
        self.flow > epsilon
    }

    #[inline]
    pub fn length(&self, network: &Network) -> f64 {
        network.length(self.edge)
    }

    /// The same link traversed the other way, with zero flow, if the network
    /// has an opposite-direction arc.
    pub fn reversed(&self, network: &Network) -> Option<BushEdge> {
        network.reverse(self.edge).map(|rev| BushEdge {
            from: self.to,
            to:   self.from,
            edge: rev,
            flow: 0.0,
        })
    }
}
