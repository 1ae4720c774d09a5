//! `ta-core` — foundational types for bush-based traffic assignment.
//!
//! This crate is a dependency of every other `ta-*` crate.  It has no `ta-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`origin`]      | `Origin` — source node plus `(destination, demand)`   |
//! | [`config`]      | `EquilibriumConfig` — tolerances and iteration caps   |
//! | [`error`]       | `TaError`, `TaResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod origin;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EquilibriumConfig;
pub use error::{TaError, TaResult};
pub use ids::{EdgeId, NodeId};
pub use origin::{Demand, Origin};
