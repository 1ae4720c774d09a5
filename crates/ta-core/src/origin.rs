//! Origin demand: one source node and the flow it sends to each destination.

use crate::{NodeId, TaError, TaResult};

/// Fixed demand from an origin to one destination.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    pub destination: NodeId,
    /// Flow units sent from the origin to `destination`.  Finite and `>= 0`.
    pub amount: f64,
}

/// A traffic origin with its ordered destination list.
///
/// Immutable once built; a bush keeps its `Origin` for its whole lifetime.
/// Node ids are not range-checked here because an `Origin` is not tied to a
/// network; the bush checks them against the network it is built on.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin {
    source: NodeId,
    demands: Vec<Demand>,
}

impl Origin {
    /// Build an origin from `(destination, demand)` pairs, preserving order.
    ///
    /// Returns [`TaError::InvalidDemand`] for a negative or non-finite demand.
    pub fn new<I>(source: NodeId, demands: I) -> TaResult<Self>
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        let demands = demands
            .into_iter()
            .map(|(destination, amount)| {
                if amount.is_finite() && amount >= 0.0 {
                    Ok(Demand { destination, amount })
                } else {
                    Err(TaError::InvalidDemand { node: destination, demand: amount })
                }
            })
            .collect::<TaResult<Vec<_>>>()?;
        Ok(Self { source, demands })
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Sum of all demands leaving this origin.
    pub fn total_demand(&self) -> f64 {
        self.demands.iter().map(|d| d.amount).sum()
    }

    /// Total demand destined for `node` (destinations may repeat).
    pub fn demand_to(&self, node: NodeId) -> f64 {
        self.demands
            .iter()
            .filter(|d| d.destination == node)
            .map(|d| d.amount)
            .sum()
    }
}
