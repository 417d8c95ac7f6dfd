//! Two-terminal circuit elements.
//!
//! This module provides the element variants the walker understands:
//! - Linear: Resistor
//! - Sources: Voltage Source
//!
//! Each element owns exactly two terminal nodes in the circuit arena and
//! defines its own voltage drop.

mod linear;
mod sources;

pub use linear::Resistor;
pub use sources::VoltageSource;

use std::fmt;

use crate::circuit::{ElementId, NodeId, Terminal};

/// The variant-specific part of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    Resistor(Resistor),
    VoltageSource(VoltageSource),
}

impl ElementKind {
    /// Short label used in summaries, e.g. `R(10)` or `V(100)`.
    pub fn label(&self) -> String {
        match self {
            ElementKind::Resistor(r) => format!("R({})", r.resistance),
            ElementKind::VoltageSource(v) => format!("V({})", v.emf),
        }
    }
}

/// A circuit element with terminals `A` and `B`.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub kind: ElementKind,
    /// Input terminal
    pub a: NodeId,
    /// Output terminal
    pub b: NodeId,
}

impl Element {
    /// Get the node for a terminal.
    pub fn terminal(&self, side: Terminal) -> NodeId {
        match side {
            Terminal::A => self.a,
            Terminal::B => self.b,
        }
    }

    /// Both terminals, `A` first.
    pub fn terminals(&self) -> [NodeId; 2] {
        [self.a, self.b]
    }

    /// Whether `node` is one of this element's terminals.
    pub fn owns(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Voltage drop across the element.
    ///
    /// `rise` is `B - A` and `current_in` the current entering through `A`.
    /// A resistor drops `R * I`; a source "drops" the negative of its rise.
    pub fn voltage_drop(&self, rise: f64, current_in: f64) -> f64 {
        match &self.kind {
            ElementKind::Resistor(r) => r.voltage_drop(current_in),
            ElementKind::VoltageSource(_) => -rise,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self.kind, ElementKind::VoltageSource(_))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind.label())
    }
}
