//! Circuit graph representation and validation.
//!
//! This module provides the arena that holds elements and their terminal
//! nodes. The [`Circuit`] struct owns every node; topology links and
//! current pairing are expressed as node ids resolved through it.

mod graph;
mod summary;
mod topology;
mod types;
mod validate;

pub use graph::Circuit;
pub use summary::CircuitSummary;
pub use topology::{parallel_loop, parallel_series_loop, series_loop, weighted_parallel_loop, SourceLoop};
pub use types::*;
pub use validate::validate_circuit;
