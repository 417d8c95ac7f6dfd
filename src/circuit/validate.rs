//! Circuit validation.

use crate::error::{CircuitError, Result};

use super::{Circuit, Terminal};

/// Validate a circuit before propagating current through it.
///
/// Checks:
/// - The circuit has at least one element
/// - Every element is fed through its A terminal by some other element
/// - Every element's B terminal feeds some other element
///
/// An open terminal usually means a `connect` call for one direction of the
/// loop is missing.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.is_empty() {
        return Err(CircuitError::invalid_topology("Circuit has no elements"));
    }

    for element in circuit.elements() {
        if circuit.feeders(element.id)?.is_empty() {
            return Err(CircuitError::OpenTerminal {
                element: element.name.clone(),
                terminal: Terminal::A,
            });
        }

        let output = circuit.node(element.b)?;
        let mut feeds_something = false;
        for (neighbor, _) in output.neighbors() {
            let node = circuit.node(*neighbor)?;
            if node.side == Terminal::A && node.owner().is_some() {
                feeds_something = true;
                break;
            }
        }
        if !feeds_something {
            return Err(CircuitError::OpenTerminal {
                element: element.name.clone(),
                terminal: Terminal::B,
            });
        }
    }

    Ok(())
}
