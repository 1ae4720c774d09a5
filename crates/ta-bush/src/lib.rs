//! `ta-bush` — origin-based equilibration for static traffic assignment.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`bush`]        | `Bush` — construction, all-or-nothing loading, accessors     |
//! | [`trees`]       | `Bush::refresh` — min/max distance trees, stale-edge flags   |
//! | [`equilibrate`] | `Bush::equilibrate_flows` — shift flow from max to min paths |
//! | [`restructure`] | `Bush::fix`, edge reversal, topological re-sort              |
//! | [`report`]      | `max_difference`, `all_or_nothing_cost`, `give_count`        |
//! | [`edge`]        | `BushEdge`                                                   |
//! | [`scratch`]     | `SortScratch` — caller-owned re-sort buffer                  |
//! | [`error`]       | `BushError`, `BushResult<T>`                                 |
//!
//! # Algorithm outline
//!
//! ```text
//! new:  Dijkstra order → keep forward arcs → refresh → all-or-nothing load
//! fix:  loop {
//!         ① equilibrate — refresh; for each destination with gap > accuracy,
//!                         shift flow from max-path to min-path segments;
//!                         refresh and repeat until a scan moves nothing
//!         ② restructure — reverse (or park) unused edges flagged by the
//!                         last refresh; re-sort nodes by max distance
//!       } until ② changes nothing
//! ```
//!
//! # Quick-start
//!
//! ```
//! use ta_bush::{Bush, SortScratch};
//! use ta_core::{EquilibriumConfig, NodeId, Origin};
//! use ta_network::{CostFunction, NetworkBuilder};
//!
//! let mut b = NetworkBuilder::new();
//! let n: Vec<NodeId> = (0..4).map(|_| b.add_node()).collect();
//! b.add_arc(n[0], n[1], CostFunction::Linear { free: 1.0, slope: 1.0 });
//! b.add_arc(n[1], n[3], CostFunction::Constant(1.0));
//! b.add_arc(n[0], n[2], CostFunction::Linear { free: 2.0, slope: 1.0 });
//! b.add_arc(n[2], n[3], CostFunction::Constant(1.0));
//! let mut network = b.build().unwrap();
//!
//! let origin = Origin::new(n[0], [(n[3], 10.0)]).unwrap();
//! let mut bush = Bush::new(origin, &mut network, EquilibriumConfig::default()).unwrap();
//! let mut scratch = SortScratch::new(network.node_count());
//!
//! bush.fix(&mut network, &mut scratch, 1e-9);
//! assert!(bush.max_difference(&network) < 1e-9);
//! ```

pub mod bush;
pub mod edge;
pub mod equilibrate;
pub mod error;
pub mod report;
pub mod restructure;
pub mod scratch;
pub mod trees;


pub use bush::{Bush, BushDump, PendingChange};
pub use edge::BushEdge;
pub use error::{BushError, BushResult};
pub use restructure::RestructureStats;
pub use scratch::SortScratch;
