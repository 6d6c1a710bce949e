//! Negotiated congestion routing for the Tessera engine.
//!
//! The [`Router`] connects every placed net's driver to its sinks through
//! the architecture's wire/pip graph. It runs the PathFinder scheme:
//! every iteration rips up and re-routes each net with an A* search whose
//! costs grow on contested resources, until an iteration completes with no
//! two nets claiming the same resource, or the iteration budget runs out.
//!
//! All wire and pip occupancy flows through the
//! [`BindingTable`](tessera_core::BindingTable); the router never touches
//! resource state behind the arbiter's back. Net processing order and path
//! tie-breaks are fixed, so identical inputs route identically.

#![warn(missing_docs)]

mod astar;

pub mod congestion;
pub mod route_tree;
pub mod router;

pub use congestion::CongestionMap;
pub use route_tree::{RouteNode, RouteResource, RouteTree};
pub use router::{RouteError, RouteReport, Router, RouterConfig};
