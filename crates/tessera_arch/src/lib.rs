//! Device architecture models for the Tessera place-and-route engine.
//!
//! This crate provides the [`Architecture`] trait that abstracts over FPGA
//! device families, the opaque resource identities ([`SiteId`], [`WireId`],
//! [`PipId`]) the rest of the engine operates on, and the
//! [`ArchitectureRegistry`] that resolves a family name to a backend
//! factory. A deterministic [`mesh`](mesh::MeshArch) reference fabric is
//! included for tests and as a template for real backends.
//!
//! # Usage
//!
//! ```
//! use tessera_arch::builtin_registry;
//! use std::collections::BTreeMap;
//!
//! let registry = builtin_registry();
//! let arch = registry.create("mesh", &BTreeMap::new()).unwrap();
//! assert_eq!(arch.grid_dims(), (8, 8));
//! ```

#![warn(missing_docs)]

pub mod ids;
pub mod mesh;
pub mod registry;
pub mod types;

pub use ids::{Loc, PipId, SiteId, WireId};
pub use mesh::MeshArch;
pub use registry::{builtin_registry, ArchFactory, ArchitectureRegistry};
pub use types::Delay;

/// The capability bundle for one device architecture.
///
/// An `Architecture` exposes the read-only resource graph (sites, wires,
/// pips and their connectivity), the site compatibility and legality
/// predicates, and the delay model. The engine only ever holds
/// `&dyn Architecture`; it never names a concrete backend type.
///
/// All queries are pure and safe to call from repeated placement and
/// routing attempts. Passing an identity that was not produced by this
/// architecture instance (foreign or out of range) is a caller contract
/// violation; implementations fail fast with a panic rather than returning
/// a recoverable error.
pub trait Architecture: std::fmt::Debug {
    // --- Identity ---

    /// Returns the canonical architecture name (e.g., "mesh").
    fn name(&self) -> &str;

    // --- Grid topology ---

    /// Returns the device grid dimensions as (columns, rows).
    fn grid_dims(&self) -> (i32, i32);

    /// Returns the grid location of the given site.
    fn site_loc(&self, site: SiteId) -> Loc;

    /// Returns the site at the given location, or `None` if the location
    /// is outside the grid or has no site at that sub-index.
    fn site_at(&self, loc: Loc) -> Option<SiteId>;

    // --- Resource enumeration ---

    /// Returns the total number of placement sites.
    fn site_count(&self) -> u32;

    /// Returns the total number of routing wires.
    fn wire_count(&self) -> u32;

    /// Returns the total number of pips.
    fn pip_count(&self) -> u32;

    /// Returns all sites in ascending ID order.
    fn sites(&self) -> Vec<SiteId> {
        (0..self.site_count()).map(SiteId::from_raw).collect()
    }

    /// Returns all wires in ascending ID order.
    fn wires(&self) -> Vec<WireId> {
        (0..self.wire_count()).map(WireId::from_raw).collect()
    }

    /// Returns all pips in ascending ID order.
    fn pips(&self) -> Vec<PipId> {
        (0..self.pip_count()).map(PipId::from_raw).collect()
    }

    // --- Connectivity ---

    /// Returns the wire driving the given pip. Immutable for the pip's
    /// lifetime.
    fn pip_src_wire(&self, pip: PipId) -> WireId;

    /// Returns the wire driven by the given pip. Immutable for the pip's
    /// lifetime.
    fn pip_dst_wire(&self, pip: PipId) -> WireId;

    /// Returns the pips whose source is the given wire, in ascending pip ID
    /// order.
    fn pips_from(&self, wire: WireId) -> Vec<PipId>;

    /// Returns the wire driven by the given site's output pin.
    fn site_source_wire(&self, site: SiteId) -> WireId;

    /// Returns the wire feeding the given site's input pin.
    fn site_sink_wire(&self, site: SiteId) -> WireId;

    // --- Compatibility and legality ---

    /// Returns whether a cell of the given type may in principle occupy the
    /// given site (the site ↔ cell-type relation).
    fn site_compatible(&self, site: SiteId, cell_type: &str) -> bool;

    /// The legality predicate: returns whether placing a cell of the given
    /// type at the given site would produce a valid configuration, beyond
    /// plain type compatibility. The `cell_type` parameter is a string tag
    /// to avoid circular dependencies with downstream crates.
    fn is_site_legal(&self, site: SiteId, cell_type: &str) -> bool;

    // --- Delay model ---

    /// Returns the delay through a pip.
    fn pip_delay(&self, pip: PipId) -> Delay;

    /// Returns an admissible estimate of the routing delay between two
    /// wires (never greater than the delay of any realizable path).
    fn estimate_delay(&self, src: WireId, dst: WireId) -> Delay;

    /// Returns an admissible estimate of the routing delay between two
    /// sites.
    fn estimate_site_delay(&self, src: SiteId, dst: SiteId) -> Delay {
        self.estimate_delay(self.site_source_wire(src), self.site_sink_wire(dst))
    }

    /// Returns the smallest meaningful delay difference for this device.
    /// Cost comparisons closer than this are considered ties.
    fn delay_epsilon(&self) -> Delay {
        Delay::constant(0.001)
    }
}
