//! Builders for common single-source wiring patterns.

use super::{Circuit, ElementId};
use crate::error::{CircuitError, Result};

/// A circuit built around one voltage source.
#[derive(Debug, Clone)]
pub struct SourceLoop {
    pub circuit: Circuit,
    /// The source, used as the propagation seed
    pub source: ElementId,
    /// Resistors in the order their values were given
    pub resistors: Vec<ElementId>,
}

fn require_resistors(resistances: &[f64]) -> Result<()> {
    if resistances.is_empty() {
        return Err(CircuitError::invalid_topology(
            "at least one resistor is required",
        ));
    }
    Ok(())
}

/// Source feeding a chain of resistors that returns to the source.
pub fn series_loop(emf: f64, resistances: &[f64]) -> Result<SourceLoop> {
    require_resistors(resistances)?;
    let mut circuit = Circuit::new();
    let source = circuit.add_voltage_source("V1", emf)?;
    let resistors = add_resistors(&mut circuit, "R", resistances)?;

    let mut prev = source;
    for &r in &resistors {
        circuit.connect(prev, r)?;
        prev = r;
    }
    circuit.connect(prev, source)?;

    Ok(SourceLoop {
        circuit,
        source,
        resistors,
    })
}

/// Source feeding resistors wired in parallel, each with the default weight.
pub fn parallel_loop(emf: f64, resistances: &[f64]) -> Result<SourceLoop> {
    let branches: Vec<(f64, f64)> = resistances
        .iter()
        .map(|&r| (r, crate::DEFAULT_SPLIT_WEIGHT))
        .collect();
    weighted_parallel_loop(emf, &branches)
}

/// Source feeding parallel resistors given as `(resistance, split weight)`.
///
/// The weight is set on the link that returns each branch to the source,
/// which is the link propagation reads when splitting at the source.
pub fn weighted_parallel_loop(emf: f64, branches: &[(f64, f64)]) -> Result<SourceLoop> {
    let resistances: Vec<f64> = branches.iter().map(|(r, _)| *r).collect();
    require_resistors(&resistances)?;
    let mut circuit = Circuit::new();
    let source = circuit.add_voltage_source("V1", emf)?;
    let resistors = add_resistors(&mut circuit, "R", &resistances)?;

    for &r in &resistors {
        circuit.connect(source, r)?;
    }
    for (&r, &(_, weight)) in resistors.iter().zip(branches) {
        circuit.connect_weighted(r, source, weight)?;
    }

    Ok(SourceLoop {
        circuit,
        source,
        resistors,
    })
}

/// Source feeding a parallel group that merges into one series resistor.
///
/// `resistors` lists the parallel branches first and the series resistor
/// last.
pub fn parallel_series_loop(emf: f64, parallel: &[f64], series: f64) -> Result<SourceLoop> {
    require_resistors(parallel)?;
    let mut circuit = Circuit::new();
    let source = circuit.add_voltage_source("V1", emf)?;
    let mut resistors = add_resistors(&mut circuit, "R", parallel)?;
    let tail = circuit.add_resistor(format!("R{}", resistors.len() + 1), series)?;

    for &r in &resistors {
        circuit.connect(source, r)?;
    }
    for &r in &resistors {
        circuit.connect(r, tail)?;
    }
    circuit.connect(tail, source)?;
    resistors.push(tail);

    Ok(SourceLoop {
        circuit,
        source,
        resistors,
    })
}

fn add_resistors(circuit: &mut Circuit, prefix: &str, values: &[f64]) -> Result<Vec<ElementId>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &r)| circuit.add_resistor(format!("{}{}", prefix, i + 1), r))
        .collect()
}
