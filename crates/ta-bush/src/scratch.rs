//! Caller-owned sort buffer for restructuring.

use ta_core::NodeId;

/// Reusable `(max distance, node)` buffer for the topological re-sort.
///
/// Allocate one per thread, sized to the network's node count, and pass it to
/// every [`Bush::fix`](crate::Bush::fix) call.  It carries no state between
/// calls; it only avoids reallocating on every restructuring pass.
#[derive(Debug, Default, Clone)]
pub struct SortScratch {
    pub(crate) entries: Vec<(f64, NodeId)>,
}

impl SortScratch {
    pub fn new(node_count: usize) -> Self {
        Self { entries: Vec::with_capacity(node_count) }
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}
