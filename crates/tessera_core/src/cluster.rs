//! Rigid-cluster placement.
//!
//! A [`Cluster`] is a group of cells that must be placed as one unit: a
//! root cell plus members at fixed grid offsets from wherever the root
//! lands. [`place_cluster`] resolves a candidate root site into a full
//! member → site assignment, or rejects the attempt with no effect on the
//! binding table.

use crate::binding::{BindError, BindingTable};
use crate::design::Design;
use crate::ids::CellId;
use crate::strength::PlaceStrength;
use serde::{Deserialize, Serialize};
use tessera_arch::{Architecture, SiteId};

/// One non-root cluster member and its offset from the root site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// The member cell.
    pub cell: CellId,
    /// Tile column offset from the root.
    pub dx: i32,
    /// Tile row offset from the root.
    pub dy: i32,
    /// Sub-site offset from the root.
    pub dz: i32,
}

/// A set of cells constrained to be placed as a rigid unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// The root cell, placed at the candidate site itself.
    pub root: CellId,
    /// The remaining members, each at a fixed offset from the root.
    pub members: Vec<ClusterMember>,
}

impl Cluster {
    /// Creates a cluster with the given root and no other members.
    pub fn new(root: CellId) -> Self {
        Self {
            root,
            members: Vec::new(),
        }
    }

    /// Adds a member at the given offset from the root and returns `self`.
    pub fn with_member(mut self, cell: CellId, dx: i32, dy: i32, dz: i32) -> Self {
        self.members.push(ClusterMember { cell, dx, dy, dz });
        self
    }

    /// Returns the total number of cells in the cluster, root included.
    pub fn len(&self) -> usize {
        1 + self.members.len()
    }

    /// Returns false; a cluster always contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Attempts to place `cluster` with its root cell at `root_site`.
///
/// Every member's required site is derived by applying the member's offset
/// to the root site's location. Each member must land on an existing site
/// that is compatible and legal for its cell type and available in the
/// binding table; if any member fails any check, the whole attempt is
/// rejected and no bindings are made.
///
/// On success the full assignment is bound at `strength`, placements are
/// recorded in the design, and the member → site assignment (root first)
/// is returned. If a bind unexpectedly fails mid-batch — contention
/// introduced between the availability check and the bind, e.g. by an
/// externally driven binding — the bindings already made for this cluster
/// are rolled back before reporting failure: no partial cluster ever
/// remains bound.
pub fn place_cluster(
    design: &mut Design,
    cluster: &Cluster,
    root_site: SiteId,
    arch: &dyn Architecture,
    bindings: &mut BindingTable,
    strength: PlaceStrength,
) -> Option<Vec<(CellId, SiteId)>> {
    let root_loc = arch.site_loc(root_site);

    // Resolve and validate every member before touching the table.
    let mut assignment: Vec<(CellId, SiteId)> = Vec::with_capacity(cluster.len());
    assignment.push((cluster.root, root_site));
    for member in &cluster.members {
        let loc = root_loc.offset(member.dx, member.dy, member.dz);
        let site = arch.site_at(loc)?;
        assignment.push((member.cell, site));
    }

    for &(cell, site) in &assignment {
        let cell_type = &design.cell(cell).cell_type;
        if !arch.site_compatible(site, cell_type)
            || !arch.is_site_legal(site, cell_type)
            || !bindings.site_available(site)
        {
            return None;
        }
    }

    // Bind the whole batch; roll back on any mid-batch contention.
    let mut bound: Vec<SiteId> = Vec::with_capacity(assignment.len());
    for &(cell, site) in &assignment {
        match bindings.bind_site(site, cell, strength) {
            Ok(_) => bound.push(site),
            Err(BindError::Contended { .. }) | Err(BindError::Pinned { .. }) => {
                for &site in &bound {
                    bindings.unbind_site(site);
                }
                return None;
            }
        }
    }

    for &(cell, site) in &assignment {
        design.cell_mut(cell).placement = Some(site);
    }
    Some(assignment)
}
