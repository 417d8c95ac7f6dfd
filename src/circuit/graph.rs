//! Circuit graph structure.

use std::iter;

use log::{debug, trace};

use super::types::{ElementId, Node, NodeId, Terminal};
use crate::components::{Element, ElementKind, Resistor, VoltageSource};
use crate::error::{CircuitError, Result};
use crate::DEFAULT_SPLIT_WEIGHT;

/// A circuit of two-terminal elements wired at their terminals.
///
/// Elements and their terminal nodes live in arenas indexed by
/// [`ElementId`] and [`NodeId`]. Each element owns its two nodes; topology
/// links and current pairing are id references between nodes.
#[derive(Debug, Default, Clone)]
pub struct Circuit {
    /// All elements, indexed by `ElementId`
    elements: Vec<Element>,
    /// All terminal nodes, indexed by `NodeId`
    nodes: Vec<Node>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element with the given initial terminal voltages.
    ///
    /// The currents of the two new terminals are paired to each other.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        kind: ElementKind,
        voltage_a: f64,
        voltage_b: f64,
    ) -> Result<ElementId> {
        let id = ElementId(self.elements.len());
        let a = NodeId(self.nodes.len());
        let b = NodeId(self.nodes.len() + 1);

        self.nodes.push(Node::new(a, Terminal::A, id, voltage_a));
        self.nodes.push(Node::new(b, Terminal::B, id, voltage_b));
        self.pair_currents(a, b)?;

        let element = Element {
            id,
            name: name.into(),
            kind,
            a,
            b,
        };
        debug!("Added {} as {} (A={}, B={})", element, id, a, b);
        self.elements.push(element);

        Ok(id)
    }

    /// Add an ideal resistor with both terminals at 0 V.
    pub fn add_resistor(&mut self, name: impl Into<String>, resistance: f64) -> Result<ElementId> {
        let name = name.into();
        let resistor = Resistor::new(&name, resistance)?;
        self.add_element(name, ElementKind::Resistor(resistor), 0.0, 0.0)
    }

    /// Add an ideal voltage source whose rise from A to B is `emf`.
    pub fn add_voltage_source(&mut self, name: impl Into<String>, emf: f64) -> Result<ElementId> {
        let name = name.into();
        let source = VoltageSource::new(&name, emf)?;
        let (voltage_a, voltage_b) = source.terminal_voltages();
        self.add_element(name, ElementKind::VoltageSource(source), voltage_a, voltage_b)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up an element.
    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(id.0)
            .ok_or(CircuitError::ElementNotFound { id })
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(CircuitError::NodeNotFound { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or(CircuitError::NodeNotFound { id })
    }

    /// Find an element by name.
    pub fn find_element(&self, name: &str) -> Option<ElementId> {
        self.elements.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// Get the name of an element.
    pub fn element_name(&self, id: ElementId) -> &str {
        self.elements.get(id.0).map_or("?", |e| e.name.as_str())
    }

    // ============ Paired currents ============

    /// Link the currents of two nodes so that each mirrors the other.
    ///
    /// Pairing happens once per element when it is built; pairing a node
    /// with itself or with a node that already has a partner is rejected.
    pub(crate) fn pair_currents(&mut self, first: NodeId, second: NodeId) -> Result<()> {
        if first == second {
            return Err(CircuitError::invalid_topology(format!(
                "{first} cannot be paired with itself"
            )));
        }
        for id in [first, second] {
            if self.node(id)?.current.is_paired() {
                return Err(CircuitError::AlreadyPaired { node: id });
            }
        }
        self.node_mut(first)?.current.link(second);
        self.node_mut(second)?.current.link(first);
        Ok(())
    }

    /// Set the current into a node and mirror the negation onto its pair.
    pub fn set_node_current(&mut self, id: NodeId, amps: f64) -> Result<()> {
        let node = self.node_mut(id)?;
        node.current.set_raw(amps);
        if let Some(pair) = node.current.pair() {
            self.node_mut(pair)?.current.set_raw(-amps);
        }
        Ok(())
    }

    pub fn node_current(&self, id: NodeId) -> Result<f64> {
        Ok(self.node(id)?.current.amps())
    }

    pub fn set_node_voltage(&mut self, id: NodeId, volts: f64) -> Result<()> {
        self.node_mut(id)?.voltage.volts = volts;
        Ok(())
    }

    pub fn node_voltage(&self, id: NodeId) -> Result<f64> {
        Ok(self.node(id)?.voltage.volts)
    }

    /// Zero every terminal current.
    pub fn reset_currents(&mut self) {
        for node in &mut self.nodes {
            node.current.set_raw(0.0);
        }
    }

    // ============ Topology ============

    /// Link `node` to `target` with a split weight.
    ///
    /// Self links and links that already exist are ignored. Returns `true`
    /// when a new link was added. Only the `node` side is written.
    ///
    /// Linking the two terminals of one element is rejected.
    pub fn add_neighbor(&mut self, node: NodeId, target: NodeId, weight: f64) -> Result<bool> {
        check_weight(weight)?;
        let home = self.node(target)?.home;
        if node != target && self.node(node)?.home == home {
            let name = self.element_name(home).to_string();
            return Err(CircuitError::ShortedElement {
                from: name.clone(),
                to: name.clone(),
                element: name,
            });
        }
        Ok(self.node_mut(node)?.add_neighbor(target, weight))
    }

    /// Wire `from`'s B terminal to `to`'s A terminal with the default weight.
    ///
    /// See [`Circuit::connect_weighted`].
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> Result<usize> {
        self.connect_weighted(from, to, DEFAULT_SPLIT_WEIGHT)
    }

    /// Wire `from`'s B terminal to `to`'s A terminal.
    ///
    /// Every node in `from.B` and its neighbourhood is linked, in both
    /// directions, to every node in `to.A` and its neighbourhood. Wiring a
    /// new element into an existing parallel group therefore links it to the
    /// whole group. Existing links keep their weight.
    ///
    /// This only wires one direction of the circuit; closing a loop needs a
    /// matching `connect(to, from)`.
    ///
    /// Returns the number of node links added.
    pub fn connect_weighted(&mut self, from: ElementId, to: ElementId, weight: f64) -> Result<usize> {
        check_weight(weight)?;
        let from_el = self.element(from)?;
        let to_el = self.element(to)?;
        if from == to {
            return Err(CircuitError::SelfConnection {
                element: from_el.name.clone(),
            });
        }

        let parents = self.cluster(from_el.b)?;
        let children = self.cluster(to_el.a)?;

        // Check the whole cross-product before writing any link.
        for &parent in &parents {
            for &child in &children {
                let (p, c) = (self.node(parent)?, self.node(child)?);
                if parent != child && p.home == c.home {
                    return Err(CircuitError::ShortedElement {
                        from: self.element_name(from).to_string(),
                        to: self.element_name(to).to_string(),
                        element: self.element_name(p.home).to_string(),
                    });
                }
            }
        }

        let mut added = 0;
        for &parent in &parents {
            for &child in &children {
                if self.node_mut(parent)?.add_neighbor(child, weight) {
                    added += 1;
                }
                if self.node_mut(child)?.add_neighbor(parent, weight) {
                    added += 1;
                }
            }
        }

        debug!(
            "Connected {} -> {} (weight {}, {} new links)",
            self.element_name(from),
            self.element_name(to),
            weight,
            added
        );
        Ok(added)
    }

    /// A node followed by its current neighbours.
    fn cluster(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.node(id)?;
        Ok(iter::once(id)
            .chain(node.adjacency.iter().map(|(n, _)| *n))
            .collect())
    }

    /// Set the split weight of an existing link, in both directions.
    pub fn set_split_weight(&mut self, node: NodeId, target: NodeId, weight: f64) -> Result<()> {
        check_weight(weight)?;
        self.node(target)?;
        let mut found = false;
        for (a, b) in [(node, target), (target, node)] {
            if let Some(entry) = self.node_mut(a)?.adjacency.iter_mut().find(|(n, _)| *n == b) {
                entry.1 = weight;
                found = true;
            }
        }
        if found {
            Ok(())
        } else {
            Err(CircuitError::invalid_topology(format!(
                "{node} and {target} are not linked"
            )))
        }
    }

    /// The sibling terminal on the same element.
    ///
    /// Fails while the node is detached from its owner.
    pub fn other_terminal(&self, id: NodeId) -> Result<NodeId> {
        let owner = self
            .node(id)?
            .owner
            .ok_or(CircuitError::DetachedNode { node: id })?;
        let element = self.element(owner)?;
        Ok(if element.a == id { element.b } else { element.a })
    }

    /// Detach a node from its owner, hiding it from traversal.
    pub fn disconnect_node(&mut self, id: NodeId) -> Result<()> {
        trace!("Detaching {}", id);
        self.node_mut(id)?.owner = None;
        Ok(())
    }

    /// Reattach a detached node to its owner.
    pub fn reconnect_node(&mut self, id: NodeId, owner: ElementId) -> Result<()> {
        if !self.element(owner)?.owns(id) {
            return Err(CircuitError::ForeignOwner {
                node: id,
                element: owner,
            });
        }
        trace!("Reattaching {} to {}", id, owner);
        self.node_mut(id)?.owner = Some(owner);
        Ok(())
    }

    /// Elements feeding current into `id` through its A terminal.
    ///
    /// A feeder is an attached neighbour that is the B terminal of its own
    /// element. Neighbours on the A side share the node in parallel and are
    /// not feeders. Returned in link order with the link's split weight.
    pub fn feeders(&self, id: ElementId) -> Result<Vec<(ElementId, f64)>> {
        let input = self.node(self.element(id)?.a)?;
        let mut feeders = Vec::with_capacity(input.adjacency.len());
        for &(neighbor, weight) in &input.adjacency {
            let node = self.node(neighbor)?;
            match node.owner {
                Some(owner) if node.side == Terminal::B => feeders.push((owner, weight)),
                Some(_) => {}
                None => trace!("Skipping detached {} next to {}", neighbor, input.id),
            }
        }
        Ok(feeders)
    }

    // ============ Element readings ============

    /// Rise from A to B across an element.
    pub fn get_voltage(&self, id: ElementId) -> Result<f64> {
        let element = self.element(id)?;
        Ok(self.node(element.b)?.voltage - self.node(element.a)?.voltage)
    }

    /// Current flowing into an element through its A terminal.
    pub fn get_current(&self, id: ElementId) -> Result<f64> {
        self.node_current(self.element(id)?.a)
    }

    /// Voltage drop across an element at its present current.
    pub fn voltage_drop(&self, id: ElementId) -> Result<f64> {
        let element = self.element(id)?;
        let rise = self.get_voltage(id)?;
        let current = self.get_current(id)?;
        Ok(element.voltage_drop(rise, current))
    }
}

fn check_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(CircuitError::InvalidWeight { weight })
    }
}
