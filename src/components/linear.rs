//! Linear passive components: Resistor.

use crate::error::{CircuitError, Result};

/// An ideal resistor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistor {
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor, rejecting negative or non-finite resistance.
    pub fn new(name: &str, resistance: f64) -> Result<Self> {
        if !resistance.is_finite() || resistance < 0.0 {
            return Err(CircuitError::invalid_parameter(
                name,
                "resistance",
                format!("expected a finite, non-negative value, got {resistance}"),
            ));
        }
        Ok(Self { resistance })
    }

    /// Voltage across the resistor for the given current (Ohm's law).
    pub fn voltage_drop(&self, current: f64) -> f64 {
        self.resistance * current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistor_voltage_drop() {
        let r = Resistor::new("R1", 10.0).unwrap();
        assert_relative_eq!(r.voltage_drop(9.0), 90.0);
        assert_relative_eq!(r.voltage_drop(-0.5), -5.0);
    }

    #[test]
    fn test_resistor_rejects_bad_values() {
        assert!(matches!(
            Resistor::new("R1", -1.0),
            Err(CircuitError::InvalidParameter { .. })
        ));
        assert!(Resistor::new("R1", f64::NAN).is_err());
        assert!(Resistor::new("R1", f64::INFINITY).is_err());
        assert!(Resistor::new("R0", 0.0).is_ok());
    }
}
