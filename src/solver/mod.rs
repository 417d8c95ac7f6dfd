//! Current propagation and loop balance.
//!
//! This module walks the circuit graph instead of solving a linear system.
//!
//! ## Propagation
//!
//! A seed current is injected at one element. Starting there, the walker
//! follows the A terminal of each element to the elements feeding it,
//! splitting the current between them:
//!
//! ```text
//!           +-- R1 --+
//!   V1 -----+        +----- V1
//!           +-- R2 --+
//! ```
//!
//! Propagating 9 A from `V1` reaches `R1` and `R2` through the node at
//! `V1.A`, and each receives `9 * w / (w1 + w2)`, 4.5 A with unit weights.
//!
//! ## Balance
//!
//! The balance walk goes once around a single loop and compares the seed's
//! rise with the drops of the elements on it. A residual near zero means the
//! seed current was the loop current.

mod balance;
mod propagate;

pub use balance::{check_balance, BalanceReport};
pub use propagate::{CurrentWalker, Propagation, PropagationConfig};

/// Largest loop residual, in volts, treated as balanced by default.
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 1e-9;

/// How current arriving at an element is divided among the branches feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Each branch gets `w / Σw` of the current, summed over live branches.
    #[default]
    Normalized,
    /// Each branch gets `w` times the current; weights are trusted to sum to 1.
    Raw,
}
