//! Design state and resource arbitration for the Tessera engine.
//!
//! This crate holds the mutable half of place and route: the [`Design`]
//! container (cells, nets, pins), the strength-ordered [`BindingTable`]
//! that maps device resources to their current occupants, and the atomic
//! [`place_cluster`] operation for rigid cell groups.
//!
//! The binding table is the single mutation gateway for resource
//! occupancy: placers and routers — native or foreign — request every bind
//! and unbind through it, which is what makes the one-owner-per-resource
//! invariant checkable at a single call site.

#![warn(missing_docs)]

pub mod binding;
pub mod cluster;
pub mod design;
pub mod ids;
pub mod strength;

pub use binding::{BindError, BindOutcome, BindingRecord, BindingTable};
pub use cluster::{place_cluster, Cluster, ClusterMember};
pub use design::{Cell, Design, Net, Pin, PortDirection};
pub use ids::{CellId, NetId, PinId};
pub use strength::PlaceStrength;
