//! The binding table and its arbitration rule.
//!
//! A [`BindingTable`] records which cell occupies each site and which net
//! occupies each wire and pip, together with a [`PlaceStrength`] tag. Every
//! mutation goes through `bind_*`/`unbind_*`; the override rule lives in
//! one private function so the strength comparison exists exactly once.
//!
//! The central invariant: at most one occupant per resource at any time. A
//! resource with no record is available.

use crate::ids::{CellId, NetId};
use crate::strength::PlaceStrength;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_arch::{Architecture, PipId, SiteId, WireId};

/// One occupancy record: who holds the resource and at what strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRecord<O> {
    /// The occupant holding the resource.
    pub owner: O,
    /// The strength the resource is held at.
    pub strength: PlaceStrength,
}

/// The successful result of a bind request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome<O> {
    /// The resource was available and is now bound.
    Bound,
    /// The occupant already held the resource; the stored strength is now
    /// the maximum of the old and requested strengths.
    AlreadyBound,
    /// A weaker occupant was displaced; the caller decides what to do with
    /// the rest of the evicted occupant's bindings.
    Evicted {
        /// The displaced occupant.
        owner: O,
        /// The strength the displaced occupant held the resource at.
        strength: PlaceStrength,
    },
}

/// A rejected bind request. Recoverable: the caller picks another resource
/// or rips up the holder first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The resource is held at a strength the request cannot displace.
    #[error("resource contended: held at strength {held}, requested {requested}")]
    Contended {
        /// The strength the current record is held at.
        held: PlaceStrength,
        /// The strength of the rejected request.
        requested: PlaceStrength,
    },
    /// The resource is pinned (`Locked`/`User`); no bind may displace it.
    #[error("resource pinned at strength {held}; only an explicit unbind removes it")]
    Pinned {
        /// The pinned strength of the current record.
        held: PlaceStrength,
    },
}

/// Applies the arbitration rule to one record slot. This is the only place
/// a strength comparison decides an override.
fn arbitrate<K: Ord, O: Copy + Eq>(
    map: &mut BTreeMap<K, BindingRecord<O>>,
    key: K,
    occupant: O,
    strength: PlaceStrength,
) -> Result<BindOutcome<O>, BindError> {
    match map.get_mut(&key) {
        None => {
            map.insert(key, BindingRecord {
                owner: occupant,
                strength,
            });
            Ok(BindOutcome::Bound)
        }
        Some(record) if record.owner == occupant => {
            record.strength = record.strength.max(strength);
            Ok(BindOutcome::AlreadyBound)
        }
        Some(record) if record.strength.is_pinned() => Err(BindError::Pinned {
            held: record.strength,
        }),
        Some(record) if strength > record.strength => {
            let evicted = *record;
            *record = BindingRecord {
                owner: occupant,
                strength,
            };
            Ok(BindOutcome::Evicted {
                owner: evicted.owner,
                strength: evicted.strength,
            })
        }
        Some(record) => Err(BindError::Contended {
            held: record.strength,
            requested: strength,
        }),
    }
}

/// The mutable occupancy state of one place-and-route run.
///
/// Sites are occupied by cells; wires and pips by nets. Storage is ordered
/// (`BTreeMap`) so iteration over bound resources is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingTable {
    sites: BTreeMap<SiteId, BindingRecord<CellId>>,
    wires: BTreeMap<WireId, BindingRecord<NetId>>,
    pips: BTreeMap<PipId, BindingRecord<NetId>>,
}

impl BindingTable {
    /// Creates an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Sites ---

    /// Requests that `cell` occupy `site` at the given strength.
    pub fn bind_site(
        &mut self,
        site: SiteId,
        cell: CellId,
        strength: PlaceStrength,
    ) -> Result<BindOutcome<CellId>, BindError> {
        arbitrate(&mut self.sites, site, cell, strength)
    }

    /// Removes the record for `site` if present; unbinding an unbound site
    /// is a no-op so rip-up logic stays simple.
    pub fn unbind_site(&mut self, site: SiteId) -> Option<BindingRecord<CellId>> {
        self.sites.remove(&site)
    }

    /// Returns whether `site` has no occupant.
    pub fn site_available(&self, site: SiteId) -> bool {
        !self.sites.contains_key(&site)
    }

    /// Returns the cell currently occupying `site`, if any.
    pub fn site_owner(&self, site: SiteId) -> Option<CellId> {
        self.sites.get(&site).map(|r| r.owner)
    }

    /// Returns the full binding record for `site`, if any.
    pub fn site_binding(&self, site: SiteId) -> Option<&BindingRecord<CellId>> {
        self.sites.get(&site)
    }

    /// Iterates over bound sites in ascending site ID order.
    pub fn bound_sites(&self) -> impl Iterator<Item = (SiteId, &BindingRecord<CellId>)> {
        self.sites.iter().map(|(&k, v)| (k, v))
    }

    // --- Wires ---

    /// Requests that `net` occupy `wire` at the given strength.
    pub fn bind_wire(
        &mut self,
        wire: WireId,
        net: NetId,
        strength: PlaceStrength,
    ) -> Result<BindOutcome<NetId>, BindError> {
        arbitrate(&mut self.wires, wire, net, strength)
    }

    /// Removes the record for `wire` if present; no-op when unbound.
    pub fn unbind_wire(&mut self, wire: WireId) -> Option<BindingRecord<NetId>> {
        self.wires.remove(&wire)
    }

    /// Returns whether `wire` has no occupant.
    pub fn wire_available(&self, wire: WireId) -> bool {
        !self.wires.contains_key(&wire)
    }

    /// Returns the net currently occupying `wire`, if any.
    pub fn wire_owner(&self, wire: WireId) -> Option<NetId> {
        self.wires.get(&wire).map(|r| r.owner)
    }

    /// Returns the full binding record for `wire`, if any.
    pub fn wire_binding(&self, wire: WireId) -> Option<&BindingRecord<NetId>> {
        self.wires.get(&wire)
    }

    /// Iterates over bound wires in ascending wire ID order.
    pub fn bound_wires(&self) -> impl Iterator<Item = (WireId, &BindingRecord<NetId>)> {
        self.wires.iter().map(|(&k, v)| (k, v))
    }

    // --- Pips ---

    /// Requests that `net` occupy `pip` at the given strength.
    pub fn bind_pip(
        &mut self,
        pip: PipId,
        net: NetId,
        strength: PlaceStrength,
    ) -> Result<BindOutcome<NetId>, BindError> {
        arbitrate(&mut self.pips, pip, net, strength)
    }

    /// Removes the record for `pip` if present; no-op when unbound.
    pub fn unbind_pip(&mut self, pip: PipId) -> Option<BindingRecord<NetId>> {
        self.pips.remove(&pip)
    }

    /// Returns whether `pip` has no occupant.
    pub fn pip_available(&self, pip: PipId) -> bool {
        !self.pips.contains_key(&pip)
    }

    /// Returns the net currently occupying `pip`, if any.
    pub fn pip_owner(&self, pip: PipId) -> Option<NetId> {
        self.pips.get(&pip).map(|r| r.owner)
    }

    /// Returns the full binding record for `pip`, if any.
    pub fn pip_binding(&self, pip: PipId) -> Option<&BindingRecord<NetId>> {
        self.pips.get(&pip)
    }

    /// Iterates over bound pips in ascending pip ID order.
    pub fn bound_pips(&self) -> impl Iterator<Item = (PipId, &BindingRecord<NetId>)> {
        self.pips.iter().map(|(&k, v)| (k, v))
    }

    // --- Whole-table queries ---

    /// Returns (bound sites, bound wires, bound pips) counts.
    pub fn bound_counts(&self) -> (usize, usize, usize) {
        (self.sites.len(), self.wires.len(), self.pips.len())
    }

    /// Returns whether the table holds no bindings at all.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty() && self.wires.is_empty() && self.pips.is_empty()
    }

    /// Validates every bound resource against the architecture that owns it.
    ///
    /// # Panics
    ///
    /// Panics if any bound identity is out of range for `arch` — such a
    /// binding can only come from a foreign identity or table corruption,
    /// both programming errors.
    pub fn check(&self, arch: &dyn Architecture) {
        for (&site, _) in &self.sites {
            assert!(
                site.as_raw() < arch.site_count(),
                "bound site {site} out of range for architecture {}",
                arch.name()
            );
        }
        for (&wire, _) in &self.wires {
            assert!(
                wire.as_raw() < arch.wire_count(),
                "bound wire {wire} out of range for architecture {}",
                arch.name()
            );
        }
        for (&pip, _) in &self.pips {
            assert!(
                pip.as_raw() < arch.pip_count(),
                "bound pip {pip} out of range for architecture {}",
                arch.name()
            );
        }
    }
}
