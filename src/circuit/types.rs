//! Core types for circuit representation.

use std::fmt;
use std::ops::Sub;

/// A unique identifier for a terminal node in the circuit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A unique identifier for an element in the circuit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Which of an element's two terminals a node is.
///
/// Current flows into an element through `A` and leaves through `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    A,
    B,
}

impl Terminal {
    /// The opposite terminal of the same element.
    pub fn other(self) -> Self {
        match self {
            Terminal::A => Terminal::B,
            Terminal::B => Terminal::A,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::A => write!(f, "A"),
            Terminal::B => write!(f, "B"),
        }
    }
}

/// An electric potential in volts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Potential {
    pub volts: f64,
}

impl Potential {
    pub fn new(volts: f64) -> Self {
        Self { volts }
    }
}

impl From<f64> for Potential {
    fn from(volts: f64) -> Self {
        Self { volts }
    }
}

/// The difference of two potentials is a plain voltage.
impl Sub for Potential {
    type Output = f64;

    fn sub(self, rhs: Self) -> f64 {
        self.volts - rhs.volts
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.volts)
    }
}

/// A current mirrored onto a partner terminal.
///
/// Current entering one terminal of an element leaves through the other, so
/// the partner always holds the negated magnitude. The pair link is an arena
/// id; writes that keep both sides in sync go through
/// [`Circuit::set_node_current`](super::Circuit::set_node_current).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairedCurrent {
    amps: f64,
    pair: Option<NodeId>,
}

impl PairedCurrent {
    /// Current magnitude in amps.
    pub fn amps(&self) -> f64 {
        self.amps
    }

    /// The node holding the mirrored current, if paired.
    pub fn pair(&self) -> Option<NodeId> {
        self.pair
    }

    pub fn is_paired(&self) -> bool {
        self.pair.is_some()
    }

    pub(crate) fn set_raw(&mut self, amps: f64) {
        self.amps = amps;
    }

    pub(crate) fn link(&mut self, other: NodeId) {
        self.pair = Some(other);
    }
}

impl fmt::Display for PairedCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amps)
    }
}

/// One terminal of a two-terminal element.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Which terminal of its element this node is
    pub side: Terminal,
    /// Voltage level at the terminal
    pub voltage: Potential,
    /// Current flowing into the element through this terminal
    pub current: PairedCurrent,
    /// Owning element, `None` while detached
    pub(crate) owner: Option<ElementId>,
    /// Element the node was built for; survives detaching
    pub(crate) home: ElementId,
    /// Topology neighbours with their split weights, in insertion order
    pub(crate) adjacency: Vec<(NodeId, f64)>,
}

impl Node {
    pub(crate) fn new(id: NodeId, side: Terminal, owner: ElementId, volts: f64) -> Self {
        Self {
            id,
            side,
            voltage: Potential::new(volts),
            current: PairedCurrent::default(),
            owner: Some(owner),
            home: owner,
            adjacency: Vec::new(),
        }
    }

    /// The owning element, or `None` while the node is detached.
    pub fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    /// The element this node is a terminal of, whether or not attached.
    pub fn home(&self) -> ElementId {
        self.home
    }

    pub fn is_detached(&self) -> bool {
        self.owner.is_none()
    }

    /// Neighbouring nodes and the split weight of each link.
    pub fn neighbors(&self) -> &[(NodeId, f64)] {
        &self.adjacency
    }

    /// Split weight of the link to `other`, if linked.
    pub fn weight_to(&self, other: NodeId) -> Option<f64> {
        self.adjacency
            .iter()
            .find(|(id, _)| *id == other)
            .map(|(_, w)| *w)
    }

    pub fn is_linked_to(&self, other: NodeId) -> bool {
        self.weight_to(other).is_some()
    }

    /// Insert a neighbour unless it is this node or already present.
    ///
    /// Returns `true` when a new link was added.
    pub(crate) fn add_neighbor(&mut self, other: NodeId, weight: f64) -> bool {
        if other == self.id || self.is_linked_to(other) {
            return false;
        }
        self.adjacency.push((other, weight));
        true
    }
}
