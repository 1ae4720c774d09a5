//! `ta-network` — the directed network shared by every bush.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`network`]       | `Network` (CSR arcs + per-arc flow/length), `NetworkBuilder` |
//! | [`cost`]          | `CostFunction` — constant, linear, BPR link performance   |
//! | [`shortest_path`] | `ShortestPaths` trait, `ShortestPathOrder`, `Dijkstra`    |
//! | [`error`]         | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Flow ownership
//!
//! Structure (arc endpoints, cost functions, reverse pairing) is fixed at
//! [`NetworkBuilder::build`].  Only flow is mutable afterwards, and only via
//! [`Network::add_flow`], which keeps every arc's cached length equal to its
//! cost function evaluated at its current flow.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `CostFunction`.         |

pub mod cost;
pub mod error;
pub mod network;
pub mod shortest_path;


pub use cost::CostFunction;
pub use error::{NetworkError, NetworkResult};
pub use network::{Network, NetworkBuilder};
pub use shortest_path::{Dijkstra, ShortestPathOrder, ShortestPaths};
