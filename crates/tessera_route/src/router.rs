//! The negotiated congestion router.
//!
//! Each routing run proceeds in iterations. Every iteration rips up and
//! re-routes each net in ascending net ID order; when a chosen path crosses
//! a resource held by another net, the holder is evicted through the
//! arbiter and the collision is recorded as a contention event. History
//! cost accumulates on contested resources and the present-overuse factor
//! grows, so each iteration raises the price of staying put. A run ends
//! converged (an iteration with zero contention events), or failed (the
//! iteration budget is exhausted, or a sink is unreachable).

use crate::astar::{astar_route, RoutedPath};
use crate::congestion::CongestionMap;
use crate::route_tree::{RouteResource, RouteTree};
use std::collections::{BTreeMap, BTreeSet};
use tessera_arch::{Architecture, PipId, SiteId, WireId};
use tessera_core::{BindError, BindingTable, Design, NetId, PlaceStrength};
use tessera_diag::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Tunable parameters of the negotiation schedule.
#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    /// Iteration budget before a run is declared failed.
    pub max_iterations: usize,
    /// History cost added per unit of overuse per iteration.
    pub history_factor: f64,
    /// Present-overuse factor for the first iteration.
    pub initial_present_factor: f64,
    /// Multiplier applied to the present-overuse factor after every
    /// iteration with contention.
    pub present_growth: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            history_factor: 1.0,
            initial_present_factor: 0.5,
            present_growth: 1.5,
        }
    }
}

/// The result of a converged routing run.
#[derive(Debug, Clone)]
pub struct RouteReport {
    /// Number of iterations the run took to converge.
    pub iterations: usize,
    /// Total contention events observed across the run.
    pub contention_events: usize,
    /// The final route tree of every routed net.
    pub routes: BTreeMap<NetId, RouteTree>,
}

/// A failed routing run. The binding table is left legal: every resource
/// still has at most one owner, and nets routed before the failure keep
/// their bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// A net's sink cannot be reached from its driver at all.
    #[error("net {net} has no path from its driver to a sink")]
    Unroutable {
        /// The offending net.
        net: NetId,
    },
    /// The iteration budget ran out with nets still fighting over
    /// resources.
    #[error("congestion unresolved after {iterations} iterations; {} nets still contending", nets.len())]
    CongestionUnresolved {
        /// Iterations completed before giving up.
        iterations: usize,
        /// The nets party to the final iteration's contention events,
        /// ascending ID order.
        nets: Vec<NetId>,
    },
}

/// One net's routing problem: fixed for the duration of a run.
struct NetTask {
    net: NetId,
    source_site: SiteId,
    source_wire: WireId,
    /// (sink site, sink wire) per routable sink, in pin order.
    sinks: Vec<(SiteId, WireId)>,
}

/// One net's current routing solution.
struct NetState {
    wires: BTreeSet<WireId>,
    pips: BTreeSet<PipId>,
    tree: RouteTree,
}

/// The negotiated congestion router.
#[derive(Debug, Default)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    /// Creates a router with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Routes every routable net in the design.
    ///
    /// A net is routable when its driver and at least one sink are placed;
    /// unplaced sinks are ignored. All wire and pip occupancy goes through
    /// `bindings` at [`PlaceStrength::Strong`]; resources pinned by other
    /// nets are routed around. Congestion history starts from zero for
    /// every run.
    pub fn route(
        &self,
        design: &Design,
        arch: &dyn Architecture,
        bindings: &mut BindingTable,
        sink: &DiagnosticSink,
    ) -> Result<RouteReport, RouteError> {
        assert!(
            self.config.max_iterations > 0,
            "router configured with a zero iteration budget"
        );
        let tasks = collect_tasks(design, arch);
        let mut congestion = CongestionMap::new(
            self.config.history_factor,
            self.config.initial_present_factor,
            self.config.present_growth,
        );
        let mut states: BTreeMap<NetId, NetState> = BTreeMap::new();
        let mut total_events = 0;

        for iteration in 1..=self.config.max_iterations {
            congestion.reset_demand();
            let mut contending: BTreeSet<NetId> = BTreeSet::new();
            let mut events = 0;

            for task in &tasks {
                rip_up(task.net, states.remove(&task.net), bindings);

                let mut state = NetState {
                    wires: BTreeSet::new(),
                    pips: BTreeSet::new(),
                    tree: RouteTree::new(task.source_site),
                };

                for &(sink_site, sink_wire) in &task.sinks {
                    let Some(path) = astar_route(
                        arch,
                        &congestion,
                        bindings,
                        task.net,
                        &state.wires,
                        task.source_wire,
                        sink_wire,
                    ) else {
                        // Drop this net's partial route; earlier nets keep
                        // their bindings and the table stays legal.
                        rip_up(task.net, Some(state), bindings);
                        sink.emit(
                            Diagnostic::error(
                                DiagnosticCode::new(Category::Route, 1),
                                format!(
                                    "no route from driver to sink site {sink_site} for net {}",
                                    design.net(task.net).name
                                ),
                            )
                            .with_subject(design.net(task.net).name.clone()),
                        );
                        return Err(RouteError::Unroutable { net: task.net });
                    };

                    events += bind_path(
                        task.net,
                        &path,
                        bindings,
                        &mut congestion,
                        &mut state,
                        &mut contending,
                    );
                    state.tree.insert_path(&path_resources(&path, sink_site));
                }

                states.insert(task.net, state);
            }

            total_events += events;

            if events == 0 {
                return Ok(RouteReport {
                    iterations: iteration,
                    contention_events: total_events,
                    routes: states.into_iter().map(|(net, s)| (net, s.tree)).collect(),
                });
            }

            congestion.update_history();
            congestion.bump_present_factor();

            if iteration == self.config.max_iterations {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Route, 20),
                        format!(
                            "routing did not converge after {} iterations \
                             ({events} contention events in the final pass)",
                            self.config.max_iterations
                        ),
                    )
                    .with_note(format!(
                        "contending nets: {}",
                        contending
                            .iter()
                            .map(|n| design.net(*n).name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
                );
                return Err(RouteError::CongestionUnresolved {
                    iterations: self.config.max_iterations,
                    nets: contending.into_iter().collect(),
                });
            }
        }

        unreachable!("iteration loop exits by convergence or budget exhaustion")
    }
}

/// Collects the routing problem for every routable net, in net ID order.
fn collect_tasks(design: &Design, arch: &dyn Architecture) -> Vec<NetTask> {
    let mut tasks = Vec::new();
    for net in &design.nets {
        let Some(driver_pin) = net.driver else {
            continue;
        };
        let Some(source_site) = design.cell(design.pin(driver_pin).cell).placement else {
            continue;
        };
        let sinks: Vec<(SiteId, WireId)> = net
            .sinks
            .iter()
            .filter_map(|&pin| design.cell(design.pin(pin).cell).placement)
            .map(|site| (site, arch.site_sink_wire(site)))
            .collect();
        if sinks.is_empty() {
            continue;
        }
        tasks.push(NetTask {
            net: net.id,
            source_site,
            source_wire: arch.site_source_wire(source_site),
            sinks,
        });
    }
    tasks
}

/// Unbinds every resource the net still owns. Resources stolen by another
/// net since the route was made are left to their new owner.
fn rip_up(net: NetId, state: Option<NetState>, bindings: &mut BindingTable) {
    let Some(state) = state else {
        return;
    };
    for &wire in &state.wires {
        if bindings.wire_owner(wire) == Some(net) {
            bindings.unbind_wire(wire);
        }
    }
    for &pip in &state.pips {
        if bindings.pip_owner(pip) == Some(net) {
            bindings.unbind_pip(pip);
        }
    }
}

/// Binds a found path back through the arbiter, evicting equal-strength
/// holders and counting each eviction as a contention event. Returns the
/// number of events.
fn bind_path(
    net: NetId,
    path: &RoutedPath,
    bindings: &mut BindingTable,
    congestion: &mut CongestionMap,
    state: &mut NetState,
    contending: &mut BTreeSet<NetId>,
) -> usize {
    let mut events = 0;

    for (index, &wire) in path.wires.iter().enumerate() {
        if index > 0 {
            let pip = path.pips[index - 1];
            if state.pips.insert(pip) {
                match bindings.bind_pip(pip, net, PlaceStrength::Strong) {
                    Ok(_) => {}
                    Err(BindError::Contended { .. }) => {
                        let victim = bindings
                            .pip_owner(pip)
                            .expect("contended pip must have an owner");
                        bindings.unbind_pip(pip);
                        if bindings.bind_pip(pip, net, PlaceStrength::Strong).is_err() {
                            unreachable!("pip rebind after rip-up cannot contend");
                        }
                        events += 1;
                        contending.insert(victim);
                        contending.insert(net);
                    }
                    Err(BindError::Pinned { .. }) => {
                        unreachable!("pinned pips are excluded from the search")
                    }
                }
                congestion.add_pip_usage(pip);
            }
        }
        if state.wires.insert(wire) {
            match bindings.bind_wire(wire, net, PlaceStrength::Strong) {
                Ok(_) => {}
                Err(BindError::Contended { .. }) => {
                    let victim = bindings
                        .wire_owner(wire)
                        .expect("contended wire must have an owner");
                    bindings.unbind_wire(wire);
                    if bindings.bind_wire(wire, net, PlaceStrength::Strong).is_err() {
                        unreachable!("wire rebind after rip-up cannot contend");
                    }
                    events += 1;
                    contending.insert(victim);
                    contending.insert(net);
                }
                Err(BindError::Pinned { .. }) => {
                    unreachable!("pinned wires are excluded from the search")
                }
            }
            congestion.add_wire_usage(wire);
        }
    }

    events
}

/// Flattens a path into the resource sequence grafted onto the route tree.
fn path_resources(path: &RoutedPath, sink_site: SiteId) -> Vec<RouteResource> {
    let mut resources = Vec::with_capacity(path.wires.len() + path.pips.len() + 1);
    for (index, &wire) in path.wires.iter().enumerate() {
        if index > 0 {
            resources.push(RouteResource::Pip(path.pips[index - 1]));
        }
        resources.push(RouteResource::Wire(wire));
    }
    resources.push(RouteResource::SinkPin(sink_site));
    resources
}
