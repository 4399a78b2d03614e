//! Flow-network engine: maximum flow, minimum s-t cut and minimum-cost flow
//! over directed integer-capacitated graphs, plus deterministic and
//! randomized global minimum cut of undirected weighted graphs.

pub mod dinic;
pub mod edmonds_karp;
pub mod error;
pub mod input;
pub mod karger;
pub mod matching;
pub mod mincost;
pub mod mincut;
pub mod network;
pub mod stoer_wagner;
pub mod union_find;

pub use error::{FlowError, Result};
pub use network::{Capacity, Cost, EdgeId, ResidualNetwork};

/// Weight of an undirected edge in the global min-cut algorithms.
pub type Weight = i64;
