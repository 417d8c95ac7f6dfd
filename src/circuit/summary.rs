//! Human-readable circuit state.

use std::fmt;

use super::{Circuit, NodeId};

/// Indented text view of every element and its terminals.
///
/// Built by [`Circuit::summary`].
pub struct CircuitSummary<'a> {
    circuit: &'a Circuit,
}

impl Circuit {
    /// Render element parameters, terminal voltages, currents and links.
    pub fn summary(&self) -> CircuitSummary<'_> {
        CircuitSummary { circuit: self }
    }
}

impl CircuitSummary<'_> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, label: &str, id: NodeId) -> fmt::Result {
        let Some(node) = self.circuit.nodes().get(id.0) else {
            return writeln!(f, "    Node {label}: missing");
        };
        writeln!(f, "    Node {label}:")?;
        writeln!(f, "        Voltage: {}", node.voltage)?;
        writeln!(f, "        Current: {}", node.current)?;

        let links: Vec<String> = node
            .neighbors()
            .iter()
            .map(|(other, weight)| {
                let owner = self
                    .circuit
                    .nodes()
                    .get(other.0)
                    .and_then(|n| n.owner())
                    .map_or("detached", |e| self.circuit.element_name(e));
                format!("{owner} ({weight})")
            })
            .collect();
        writeln!(f, "        Links To: [{}]", links.join(", "))
    }
}

impl fmt::Display for CircuitSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.circuit.elements() {
            writeln!(f, "{element} [{}]", element.id)?;
            self.write_node(f, "A", element.a)?;
            self.write_node(f, "B", element.b)?;
        }
        Ok(())
    }
}
