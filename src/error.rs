//! Error types for the loopwalk circuit graph.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! misuse of the graph while wiring it, failed lookups, and the diagnostics
//! raised by the balance walk.

use thiserror::Error;

use crate::circuit::{ElementId, NodeId, Terminal};

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all loopwalk operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    // ============ Lookup Errors ============
    /// Element id does not belong to this circuit
    #[error("Element {id} not found in circuit")]
    ElementNotFound { id: ElementId },

    /// Node id does not belong to this circuit
    #[error("Node {id} not found in circuit")]
    NodeNotFound { id: NodeId },

    // ============ Topology Errors ============
    /// An element was connected to itself
    #[error("Element '{element}' cannot be connected to itself")]
    SelfConnection { element: String },

    /// Wiring would link an element's own terminals together
    #[error("Connecting '{from}' to '{to}' would short the terminals of '{element}'")]
    ShortedElement {
        from: String,
        to: String,
        element: String,
    },

    /// A node was asked for its sibling while detached from its owner
    #[error("Node {node} is detached from its element")]
    DetachedNode { node: NodeId },

    /// A node was reattached to an element that does not own it
    #[error("Node {node} does not belong to element {element}")]
    ForeignOwner { node: NodeId, element: ElementId },

    /// Terminal left unwired
    #[error("Terminal {terminal} of '{element}' is open")]
    OpenTerminal { element: String, terminal: Terminal },

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Pairing Errors ============
    /// A paired current was paired a second time
    #[error("Current at node {node} is already paired")]
    AlreadyPaired { node: NodeId },

    // ============ Parameter Errors ============
    /// Invalid element parameter
    #[error("Invalid parameter '{param}' for element '{element}': {message}")]
    InvalidParameter {
        element: String,
        param: String,
        message: String,
    },

    /// Split weight that is negative or not finite
    #[error("Invalid split weight {weight}: must be finite and non-negative")]
    InvalidWeight { weight: f64 },

    // ============ Balance Errors ============
    /// Balance walk reached an element with nothing feeding it
    #[error("Balance walk stopped at '{element}': no element feeds its A terminal")]
    OpenLoop { element: String },

    /// Balance walk went around a cycle that does not contain the seed
    #[error("Balance walk revisited '{element}' without returning to the seed")]
    LoopNotClosed { element: String },
}

impl CircuitError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        element: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            element: element.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid topology error
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }
}
