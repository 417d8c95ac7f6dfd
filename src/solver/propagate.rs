//! Breadth-first current propagation.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{info, trace, warn};

use crate::circuit::{Circuit, ElementId};
use crate::error::Result;

use super::{SplitPolicy, DEFAULT_BALANCE_TOLERANCE};
use crate::DEFAULT_SEED_CURRENT;

/// Configuration for the current walker.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// How incoming current is divided between branches.
    pub split_policy: SplitPolicy,
    /// Largest loop residual (volts) still reported as balanced.
    pub balance_tolerance: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            split_policy: SplitPolicy::Normalized,
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
        }
    }
}

impl PropagationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the split policy.
    pub fn with_split_policy(mut self, split_policy: SplitPolicy) -> Self {
        self.split_policy = split_policy;
        self
    }

    /// Set the balance tolerance (in volts).
    pub fn with_balance_tolerance(mut self, tolerance: f64) -> Self {
        self.balance_tolerance = tolerance;
        self
    }
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagation {
    /// Elements in the order they were visited
    pub visited: Vec<ElementId>,
    /// Current added to each visited element during this pass
    pub assigned: HashMap<ElementId, f64>,
    /// Branch points whose live weights summed to zero
    pub degenerate_splits: usize,
}

impl Propagation {
    pub fn is_visited(&self, id: ElementId) -> bool {
        self.assigned.contains_key(&id)
    }

    /// Current this pass added to `id`, or `None` if the walk never reached it.
    pub fn current_for(&self, id: ElementId) -> Option<f64> {
        self.assigned.get(&id).copied()
    }

    /// Elements of `circuit` this pass did not reach.
    pub fn unvisited(&self, circuit: &Circuit) -> Vec<ElementId> {
        circuit
            .elements()
            .iter()
            .map(|e| e.id)
            .filter(|id| !self.is_visited(*id))
            .collect()
    }
}

/// Walks a circuit from a seed element, assigning current to each element
/// it reaches.
#[derive(Debug, Clone, Default)]
pub struct CurrentWalker {
    config: PropagationConfig,
}

impl CurrentWalker {
    /// Create a walker with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker with custom configuration.
    pub fn with_config(config: PropagationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Propagate the default seed current from `seed`.
    pub fn simulate(&self, circuit: &mut Circuit, seed: ElementId) -> Result<Propagation> {
        self.propagate(circuit, seed, DEFAULT_SEED_CURRENT)
    }

    /// Inject `seed_current` at `seed` and spread it through the circuit.
    ///
    /// Each element is taken from the queue once. Its incoming current is
    /// split across the live feeders of its A terminal (attached B terminals
    /// of elements not yet visited) and added to whatever its A terminal
    /// already carries. An element reached by several branches before it is
    /// taken from the queue receives their sum.
    ///
    /// A branch that reaches an element after it was taken from the queue is
    /// dropped by the visited guard. With parallel branches of unequal length
    /// that reconverge upstream, the shared element therefore only receives
    /// the current of the shorter branch.
    pub fn propagate(
        &self,
        circuit: &mut Circuit,
        seed: ElementId,
        seed_current: f64,
    ) -> Result<Propagation> {
        circuit.element(seed)?;

        let mut report = Propagation::default();
        let mut visited: HashSet<ElementId> = HashSet::new();
        let mut queue: VecDeque<ElementId> = VecDeque::new();
        let mut pending: HashMap<ElementId, f64> = HashMap::new();

        queue.push_back(seed);
        pending.insert(seed, seed_current);

        while let Some(element) = queue.pop_front() {
            let incoming = pending.remove(&element).unwrap_or(0.0);
            if !visited.insert(element) {
                continue;
            }

            let branches: Vec<(ElementId, f64)> = circuit
                .feeders(element)?
                .into_iter()
                .filter(|(owner, _)| !visited.contains(owner))
                .collect();

            let shares = self.split(incoming, &branches, &mut report);
            for ((next, _), share) in branches.iter().zip(shares) {
                trace!(
                    "{} -> {}: {} A",
                    circuit.element_name(element),
                    circuit.element_name(*next),
                    share
                );
                match pending.get_mut(next) {
                    Some(amps) => *amps += share,
                    None => {
                        pending.insert(*next, share);
                        queue.push_back(*next);
                    }
                }
            }

            let input = circuit.element(element)?.a;
            let previous = circuit.node_current(input)?;
            circuit.set_node_current(input, previous + incoming)?;

            report.visited.push(element);
            report.assigned.insert(element, incoming);
        }

        info!(
            "Propagated {} A from {} through {} of {} elements",
            seed_current,
            circuit.element_name(seed),
            report.visited.len(),
            circuit.len()
        );
        Ok(report)
    }

    fn split(&self, incoming: f64, branches: &[(ElementId, f64)], report: &mut Propagation) -> Vec<f64> {
        match self.config.split_policy {
            SplitPolicy::Raw => branches.iter().map(|(_, w)| incoming * w).collect(),
            SplitPolicy::Normalized => {
                let total: f64 = branches.iter().map(|(_, w)| w).sum();
                if branches.is_empty() {
                    Vec::new()
                } else if total == 0.0 {
                    warn!(
                        "All {} branches carry zero weight; {} A is not passed on",
                        branches.len(),
                        incoming
                    );
                    report.degenerate_splits += 1;
                    vec![0.0; branches.len()]
                } else {
                    branches.iter().map(|(_, w)| incoming * w / total).collect()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{parallel_loop, parallel_series_loop, series_loop, weighted_parallel_loop};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn current(circuit: &Circuit, id: ElementId) -> f64 {
        circuit.get_current(id).unwrap()
    }

    #[test]
    fn test_single_resistor() {
        let mut circuit = Circuit::new();
        let v = circuit.add_voltage_source("V1", 100.0).unwrap();
        let r = circuit.add_resistor("R1", 10.0).unwrap();
        circuit.connect(v, r).unwrap();
        circuit.connect(r, v).unwrap();

        let report = CurrentWalker::new().propagate(&mut circuit, v, 9.0).unwrap();

        assert_relative_eq!(current(&circuit, r), 9.0);
        assert_relative_eq!(circuit.voltage_drop(r).unwrap(), 90.0);
        assert_eq!(report.visited, vec![v, r]);
    }

    #[test]
    fn test_series_carries_seed_current() {
        let mut built = series_loop(100.0, &[10.0, 20.0]).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        for &r in &built.resistors {
            assert_relative_eq!(current(&built.circuit, r), 9.0);
        }
    }

    #[test]
    fn test_long_series_chain() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut built = series_loop(12.0, &values).unwrap();
        let report = CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 0.5)
            .unwrap();

        assert_eq!(report.visited.len(), values.len() + 1);
        for &r in &built.resistors {
            assert_relative_eq!(current(&built.circuit, r), 0.5);
        }
    }

    #[test]
    fn test_parallel_equal_weights_split_evenly() {
        let mut built = parallel_loop(100.0, &[10.0, 20.0]).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        assert_relative_eq!(current(&built.circuit, built.resistors[0]), 4.5);
        assert_relative_eq!(current(&built.circuit, built.resistors[1]), 4.5);
    }

    #[test]
    fn test_parallel_unequal_weights() {
        let mut built = weighted_parallel_loop(100.0, &[(10.0, 0.25), (20.0, 0.75)]).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 8.0)
            .unwrap();

        assert_relative_eq!(current(&built.circuit, built.resistors[0]), 8.0 * 0.25);
        assert_relative_eq!(current(&built.circuit, built.resistors[1]), 8.0 * 0.75);
    }

    #[test]
    fn test_normalized_weights_need_not_sum_to_one() {
        let mut built = weighted_parallel_loop(100.0, &[(10.0, 1.0), (20.0, 3.0)]).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 8.0)
            .unwrap();

        assert_relative_eq!(current(&built.circuit, built.resistors[0]), 2.0);
        assert_relative_eq!(current(&built.circuit, built.resistors[1]), 6.0);
    }

    #[test]
    fn test_raw_weights_are_applied_as_given() {
        let walker = CurrentWalker::with_config(PropagationConfig::new().with_split_policy(SplitPolicy::Raw));

        let mut even = parallel_loop(100.0, &[10.0, 20.0]).unwrap();
        walker.propagate(&mut even.circuit, even.source, 9.0).unwrap();
        // Unnormalized unit weights hand the full current to every branch
        assert_relative_eq!(current(&even.circuit, even.resistors[0]), 9.0);
        assert_relative_eq!(current(&even.circuit, even.resistors[1]), 9.0);

        let mut weighted = weighted_parallel_loop(100.0, &[(10.0, 0.3), (20.0, 0.7)]).unwrap();
        walker
            .propagate(&mut weighted.circuit, weighted.source, 9.0)
            .unwrap();
        assert_relative_eq!(current(&weighted.circuit, weighted.resistors[0]), 9.0 * 0.3);
        assert_relative_eq!(current(&weighted.circuit, weighted.resistors[1]), 9.0 * 0.7);
    }

    #[test]
    fn test_conservation_at_shared_nodes() {
        let mut built = parallel_series_loop(100.0, &[10.0, 20.0, 40.0], 30.0).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        let tail = *built.resistors.last().unwrap();
        let branches = &built.resistors[..built.resistors.len() - 1];
        let branch_sum: f64 = branches.iter().map(|&r| current(&built.circuit, r)).sum();

        // The series resistor and the source each carry the whole loop current,
        // and the parallel branches add back up to it on both of their nodes
        assert_relative_eq!(current(&built.circuit, tail), 9.0);
        assert_relative_eq!(current(&built.circuit, built.source), 9.0);
        assert_relative_eq!(branch_sum, current(&built.circuit, tail), epsilon = 1e-12);
        for &r in branches {
            assert_relative_eq!(current(&built.circuit, r), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_each_element_visited_once() {
        let mut built = parallel_series_loop(100.0, &[10.0, 20.0], 30.0).unwrap();
        let report = CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        let mut seen = report.visited.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), report.visited.len());
        assert_eq!(report.visited.len(), built.circuit.len());
    }

    #[test]
    fn test_reconverging_branches_sum_before_expanding() {
        // V -> R1 -> {R2, R3} -> R4 -> V, walked backwards from V
        let mut circuit = Circuit::new();
        let v = circuit.add_voltage_source("V1", 100.0).unwrap();
        let r1 = circuit.add_resistor("R1", 10.0).unwrap();
        let r2 = circuit.add_resistor("R2", 20.0).unwrap();
        let r3 = circuit.add_resistor("R3", 20.0).unwrap();
        let r4 = circuit.add_resistor("R4", 10.0).unwrap();
        circuit.connect(v, r1).unwrap();
        circuit.connect(r1, r2).unwrap();
        circuit.connect(r1, r3).unwrap();
        circuit.connect(r2, r4).unwrap();
        circuit.connect(r3, r4).unwrap();
        circuit.connect(r4, v).unwrap();

        let report = CurrentWalker::new().propagate(&mut circuit, v, 9.0).unwrap();

        assert_relative_eq!(current(&circuit, r4), 9.0);
        assert_relative_eq!(current(&circuit, r2), 4.5);
        assert_relative_eq!(current(&circuit, r3), 4.5);
        assert_relative_eq!(current(&circuit, r1), 9.0);
        assert_eq!(report.visited, vec![v, r4, r2, r3, r1]);
    }

    #[test]
    fn test_unequal_branches_drop_late_current() {
        // Ra -> {Rb -> Rb2 -> Rb3, Rc} -> Re -> V, walked backwards from V
        let mut circuit = Circuit::new();
        let v = circuit.add_voltage_source("V1", 100.0).unwrap();
        let ra = circuit.add_resistor("Ra", 10.0).unwrap();
        let rb = circuit.add_resistor("Rb", 10.0).unwrap();
        let rb2 = circuit.add_resistor("Rb2", 10.0).unwrap();
        let rb3 = circuit.add_resistor("Rb3", 10.0).unwrap();
        let rc = circuit.add_resistor("Rc", 10.0).unwrap();
        let re = circuit.add_resistor("Re", 10.0).unwrap();
        circuit.connect(v, ra).unwrap();
        circuit.connect(ra, rb).unwrap();
        circuit.connect(ra, rc).unwrap();
        circuit.connect(rb, rb2).unwrap();
        circuit.connect(rb2, rb3).unwrap();
        circuit.connect(rb3, re).unwrap();
        circuit.connect(rc, re).unwrap();
        circuit.connect(re, v).unwrap();

        let report = CurrentWalker::new().propagate(&mut circuit, v, 9.0).unwrap();

        assert_relative_eq!(current(&circuit, re), 9.0);
        assert_relative_eq!(current(&circuit, rc), 4.5);
        for r in [rb, rb2, rb3] {
            assert_relative_eq!(current(&circuit, r), 4.5);
        }
        // Rc's share reaches Ra first; Rb's share arrives after Ra was expanded
        assert_relative_eq!(current(&circuit, ra), 4.5);
        assert_eq!(report.visited, vec![v, re, rb3, rc, rb2, ra, rb]);
        assert_eq!(report.visited.len(), circuit.len());
    }

    #[test]
    fn test_pairing_holds_after_propagation() {
        let mut built = parallel_series_loop(100.0, &[10.0, 20.0], 30.0).unwrap();
        CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        for element in built.circuit.elements() {
            let a = built.circuit.node_current(element.a).unwrap();
            let b = built.circuit.node_current(element.b).unwrap();
            assert_abs_diff_eq!(a, -b);
        }
    }

    #[test]
    fn test_repeated_propagation_accumulates() {
        let mut built = series_loop(100.0, &[10.0]).unwrap();
        let walker = CurrentWalker::new();
        walker.propagate(&mut built.circuit, built.source, 9.0).unwrap();
        walker.propagate(&mut built.circuit, built.source, 1.0).unwrap();
        assert_relative_eq!(current(&built.circuit, built.resistors[0]), 10.0);

        built.circuit.reset_currents();
        assert_eq!(current(&built.circuit, built.resistors[0]), 0.0);
    }

    #[test]
    fn test_unreached_elements_are_reported() {
        let mut circuit = Circuit::new();
        let v = circuit.add_voltage_source("V1", 100.0).unwrap();
        let r1 = circuit.add_resistor("R1", 10.0).unwrap();
        let r2 = circuit.add_resistor("R2", 10.0).unwrap();
        circuit.connect(v, r1).unwrap();
        circuit.connect(r1, v).unwrap();
        let r2a = circuit.element(r2).unwrap().a;
        circuit.set_node_current(r2a, 2.0).unwrap();

        let report = CurrentWalker::new().propagate(&mut circuit, v, 9.0).unwrap();

        assert_eq!(report.current_for(r1), Some(9.0));
        assert_eq!(report.current_for(r2), None);
        assert_eq!(report.unvisited(&circuit), vec![r2]);
        // Left as it was before the walk
        assert_eq!(current(&circuit, r2), 2.0);
    }

    #[test]
    fn test_detached_feeder_is_skipped() {
        let mut built = parallel_loop(100.0, &[10.0, 20.0]).unwrap();
        let r1b = built.circuit.element(built.resistors[0]).unwrap().b;
        built.circuit.disconnect_node(r1b).unwrap();

        let report = CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        assert_relative_eq!(current(&built.circuit, built.resistors[1]), 9.0);
        assert!(!report.is_visited(built.resistors[0]));
    }

    #[test]
    fn test_zero_weights_are_guarded() {
        let mut built = weighted_parallel_loop(100.0, &[(10.0, 0.0), (20.0, 0.0)]).unwrap();
        let report = CurrentWalker::new()
            .propagate(&mut built.circuit, built.source, 9.0)
            .unwrap();

        assert_eq!(report.degenerate_splits, 1);
        for &r in &built.resistors {
            let amps = current(&built.circuit, r);
            assert!(amps.is_finite());
            assert_eq!(amps, 0.0);
        }
    }

    #[test]
    fn test_simulate_uses_default_seed() {
        let mut built = series_loop(100.0, &[10.0]).unwrap();
        CurrentWalker::new()
            .simulate(&mut built.circuit, built.source)
            .unwrap();
        assert_relative_eq!(current(&built.circuit, built.resistors[0]), DEFAULT_SEED_CURRENT);
    }

    #[test]
    fn test_unknown_seed() {
        let mut circuit = Circuit::new();
        assert!(CurrentWalker::new()
            .propagate(&mut circuit, ElementId(0), 1.0)
            .is_err());
    }
}
