//! # Loopwalk
//!
//! A resistive DC circuit modelled as a graph of two-terminal elements.
//!
//! This library provides:
//! - An arena-backed circuit graph of ideal voltage sources and resistors
//! - Series/parallel wiring by linking element terminals
//! - A breadth-first walk that spreads a seed current over the circuit
//! - A single-loop Kirchhoff voltage check
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Circuit graph, terminal nodes, wiring and validation
//! - [`components`] - Element variants (resistor, voltage source)
//! - [`solver`] - Current propagation and loop balance
//!
//! ## Usage
//!
//! ```
//! use loopwalk::{Circuit, CurrentWalker};
//!
//! let mut circuit = Circuit::new();
//! let v1 = circuit.add_voltage_source("V1", 100.0)?;
//! let r1 = circuit.add_resistor("R1", 10.0)?;
//! circuit.connect(v1, r1)?;
//! circuit.connect(r1, v1)?;
//!
//! CurrentWalker::new().propagate(&mut circuit, v1, 9.0)?;
//! assert_eq!(circuit.get_current(r1)?, 9.0);
//! assert_eq!(circuit.voltage_drop(r1)?, 90.0);
//! # Ok::<(), loopwalk::CircuitError>(())
//! ```
//!
//! ## Method
//!
//! Each element has terminals `A` (current in) and `B` (current out) whose
//! currents mirror each other. `connect(x, y)` ties `x.B` to `y.A`. The walk
//! starts at a seed and moves against the flow, from each element's `A`
//! terminal to the `B` terminals feeding it, so every element is reached
//! once. This approximates Kirchhoff's current law without solving the
//! network. It is exact for series chains and for parallel groups whose
//! branches have the same number of elements. When branches of different
//! lengths meet again upstream, current from the longer branch arrives after
//! the shared element was expanded and is dropped; see
//! [`CurrentWalker::propagate`].

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{CircuitError, Result};
pub use solver::{CurrentWalker, PropagationConfig, SplitPolicy};

/// Split weight given to links made by `connect`.
pub const DEFAULT_SPLIT_WEIGHT: f64 = 1.0;

/// Seed current, in amps, injected by [`CurrentWalker::simulate`].
pub const DEFAULT_SEED_CURRENT: f64 = 9.0;
