//! Voltage sources.

use crate::error::{CircuitError, Result};

/// An ideal DC voltage source.
///
/// The source is built with its A terminal at 0 V and its B terminal at the
/// EMF, so the rise from A to B equals the EMF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageSource {
    /// Source EMF in volts
    pub emf: f64,
}

impl VoltageSource {
    /// Create a new voltage source, rejecting a non-finite EMF.
    pub fn new(name: &str, emf: f64) -> Result<Self> {
        if !emf.is_finite() {
            return Err(CircuitError::invalid_parameter(
                name,
                "emf",
                format!("expected a finite value, got {emf}"),
            ));
        }
        Ok(Self { emf })
    }

    /// Initial terminal potentials `(A, B)`.
    pub fn terminal_voltages(&self) -> (f64, f64) {
        (0.0, self.emf)
    }
}
