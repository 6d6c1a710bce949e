//! Congestion tracking for negotiated congestion routing.
//!
//! Tracks how many nets touched each routing resource in the current
//! iteration (demand) and how often each resource has been overused across
//! iterations (history). The present-overuse penalty is scaled by a factor
//! that grows every iteration, so staying on a contested resource becomes
//! progressively more expensive until some net gives way.

use std::collections::HashMap;
use tessera_arch::{PipId, WireId};

/// Per-resource congestion state for one routing run.
///
/// Every routing resource has capacity 1: wires and pips carry one net's
/// signal. Demand resets each iteration; history persists for the length
/// of the run.
#[derive(Debug, Clone)]
pub struct CongestionMap {
    wire_demand: HashMap<WireId, u32>,
    pip_demand: HashMap<PipId, u32>,
    wire_history: HashMap<WireId, f64>,
    pip_history: HashMap<PipId, f64>,
    capacity: u32,
    history_factor: f64,
    present_factor: f64,
    present_growth: f64,
}

impl CongestionMap {
    /// Creates a fresh map with the given negotiation parameters.
    pub fn new(history_factor: f64, initial_present_factor: f64, present_growth: f64) -> Self {
        Self {
            wire_demand: HashMap::new(),
            pip_demand: HashMap::new(),
            wire_history: HashMap::new(),
            pip_history: HashMap::new(),
            capacity: 1,
            history_factor,
            present_factor: initial_present_factor,
            present_growth,
        }
    }

    /// Records that one more net is using the given wire this iteration.
    pub fn add_wire_usage(&mut self, wire: WireId) {
        *self.wire_demand.entry(wire).or_insert(0) += 1;
    }

    /// Records that one more net is using the given pip this iteration.
    pub fn add_pip_usage(&mut self, pip: PipId) {
        *self.pip_demand.entry(pip).or_insert(0) += 1;
    }

    /// Returns the congestion cost a net pays to route through `wire`.
    ///
    /// The present term is prospective: it prices the wire as if the
    /// querying net joined its current users, so a wire already claimed by
    /// another net costs a full present-factor even before it is overused.
    pub fn wire_cost(&self, wire: WireId) -> f64 {
        let demand = *self.wire_demand.get(&wire).unwrap_or(&0);
        let history = *self.wire_history.get(&wire).unwrap_or(&0.0);
        self.present_penalty(demand) + history
    }

    /// Returns the congestion cost a net pays to route through `pip`.
    pub fn pip_cost(&self, pip: PipId) -> f64 {
        let demand = *self.pip_demand.get(&pip).unwrap_or(&0);
        let history = *self.pip_history.get(&pip).unwrap_or(&0.0);
        self.present_penalty(demand) + history
    }

    fn present_penalty(&self, demand: u32) -> f64 {
        let prospective = demand + 1;
        if prospective > self.capacity {
            self.present_factor * (prospective - self.capacity) as f64
        } else {
            0.0
        }
    }

    /// Returns whether any resource is overused (demand > capacity).
    pub fn has_congestion(&self) -> bool {
        self.wire_demand.values().any(|&d| d > self.capacity)
            || self.pip_demand.values().any(|&d| d > self.capacity)
    }

    /// Returns the number of overused resources.
    pub fn overused_count(&self) -> usize {
        self.wire_demand
            .values()
            .filter(|&&d| d > self.capacity)
            .count()
            + self
                .pip_demand
                .values()
                .filter(|&&d| d > self.capacity)
                .count()
    }

    /// Accumulates history cost for every overused resource, making it
    /// more expensive in future iterations.
    pub fn update_history(&mut self) {
        for (&wire, &demand) in &self.wire_demand {
            if demand > self.capacity {
                let overflow = (demand - self.capacity) as f64;
                *self.wire_history.entry(wire).or_insert(0.0) += overflow * self.history_factor;
            }
        }
        for (&pip, &demand) in &self.pip_demand {
            if demand > self.capacity {
                let overflow = (demand - self.capacity) as f64;
                *self.pip_history.entry(pip).or_insert(0.0) += overflow * self.history_factor;
            }
        }
    }

    /// Raises the present-overuse factor for the next iteration.
    pub fn bump_present_factor(&mut self) {
        self.present_factor *= self.present_growth;
    }

    /// Clears all demand counters (called at the start of each iteration).
    pub fn reset_demand(&mut self) {
        self.wire_demand.clear();
        self.pip_demand.clear();
    }

    /// Returns the number of resources carrying nonzero history cost.
    pub fn history_len(&self) -> usize {
        self.wire_history.len() + self.pip_history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> CongestionMap {
        CongestionMap::new(1.0, 0.5, 1.5)
    }

    #[test]
    fn empty_map() {
        let m = map();
        assert!(!m.has_congestion());
        assert_eq!(m.overused_count(), 0);
        assert_eq!(m.history_len(), 0);
    }

    #[test]
    fn unused_wire_costs_nothing() {
        let m = map();
        assert_eq!(m.wire_cost(WireId::from_raw(0)), 0.0);
        assert_eq!(m.pip_cost(PipId::from_raw(0)), 0.0);
    }

    #[test]
    fn claimed_wire_costs_present_factor() {
        let mut m = map();
        let w = WireId::from_raw(0);
        m.add_wire_usage(w);
        // One holder, capacity 1: joining would overuse by one.
        assert_eq!(m.wire_cost(w), 0.5);
        assert!(!m.has_congestion());
    }

    #[test]
    fn double_usage_is_congestion() {
        let mut m = map();
        let w = WireId::from_raw(0);
        m.add_wire_usage(w);
        m.add_wire_usage(w);
        assert!(m.has_congestion());
        assert_eq!(m.overused_count(), 1);
    }

    #[test]
    fn pip_demand_counts_separately() {
        let mut m = map();
        m.add_pip_usage(PipId::from_raw(3));
        m.add_pip_usage(PipId::from_raw(3));
        m.add_wire_usage(WireId::from_raw(3));
        assert_eq!(m.overused_count(), 1);
        assert!(m.pip_cost(PipId::from_raw(3)) > m.wire_cost(WireId::from_raw(3)));
    }

    #[test]
    fn history_accumulates_across_iterations() {
        let mut m = map();
        let w = WireId::from_raw(0);
        m.add_wire_usage(w);
        m.add_wire_usage(w);
        m.update_history();
        let after_one = m.wire_cost(w);

        m.update_history();
        let after_two = m.wire_cost(w);
        assert!(after_two > after_one);
    }

    #[test]
    fn history_persists_after_demand_reset() {
        let mut m = map();
        let w = WireId::from_raw(0);
        m.add_wire_usage(w);
        m.add_wire_usage(w);
        m.update_history();
        m.reset_demand();

        assert!(!m.has_congestion());
        assert!(m.wire_cost(w) > 0.0);
        assert_eq!(m.history_len(), 1);
    }

    #[test]
    fn present_factor_growth_raises_cost() {
        let mut m = map();
        let w = WireId::from_raw(0);
        m.add_wire_usage(w);
        let before = m.wire_cost(w);
        m.bump_present_factor();
        let after = m.wire_cost(w);
        assert!(after > before);
    }

    #[test]
    fn under_capacity_history_untouched() {
        let mut m = map();
        m.add_wire_usage(WireId::from_raw(0));
        m.update_history();
        assert_eq!(m.history_len(), 0);
    }
}
