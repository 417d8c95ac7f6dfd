//! Kirchhoff voltage check along a single loop.

use std::collections::HashSet;

use log::debug;

use crate::circuit::{Circuit, ElementId};
use crate::error::{CircuitError, Result};

use super::CurrentWalker;

/// Result of walking one loop.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    /// Seed rise minus the summed drops of the other elements, in volts
    pub residual: f64,
    /// Elements walked, excluding the seed
    pub path: Vec<ElementId>,
}

impl BalanceReport {
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        self.residual.abs() <= tolerance
    }
}

/// Walk the loop through `seed` and compare its rise with the drops.
///
/// From the seed, the walk repeatedly steps to the first element feeding
/// the current element's A terminal until it arrives back at the seed. Only
/// single-loop circuits give a meaningful answer: at a parallel branch the
/// first feeder is taken and the others are ignored.
pub fn check_balance(circuit: &Circuit, seed: ElementId) -> Result<BalanceReport> {
    let rise = circuit.get_voltage(seed)?;
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    let mut drops = 0.0;

    let mut next = first_feeder(circuit, seed)?;
    while next != seed {
        if !seen.insert(next) {
            return Err(CircuitError::LoopNotClosed {
                element: circuit.element_name(next).to_string(),
            });
        }
        drops += circuit.voltage_drop(next)?;
        path.push(next);
        next = first_feeder(circuit, next)?;
    }

    let residual = rise - drops;
    debug!(
        "Loop through {} ({} elements): rise {} V, drops {} V, residual {} V",
        circuit.element_name(seed),
        path.len(),
        rise,
        drops,
        residual
    );
    Ok(BalanceReport { residual, path })
}

fn first_feeder(circuit: &Circuit, id: ElementId) -> Result<ElementId> {
    circuit
        .feeders(id)?
        .first()
        .map(|(owner, _)| *owner)
        .ok_or_else(|| CircuitError::OpenLoop {
            element: circuit.element_name(id).to_string(),
        })
}

impl CurrentWalker {
    /// Whether the loop through `seed` balances within the configured tolerance.
    pub fn is_balanced(&self, circuit: &Circuit, seed: ElementId) -> Result<bool> {
        Ok(check_balance(circuit, seed)?.is_balanced(self.config().balance_tolerance))
    }
}
