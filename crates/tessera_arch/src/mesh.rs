//! A deterministic grid-fabric reference backend.
//!
//! `MeshArch` models a `width × height` tile grid. Every tile carries three
//! sites (z0 general logic, z1 flip-flop only, z2 I/O) and a small local
//! routing pattern: each site has a dedicated input and output wire, the
//! tile has one hub wire, and pips connect site outputs to the hub, the hub
//! to site inputs, and the hub to the four neighboring hubs. The fabric is
//! intentionally small and regular; it exists to exercise the engine and to
//! show real backends the contract they must satisfy.
//!
//! Resource IDs are assigned in a fixed construction order (tiles row-major
//! from the origin), so two instances with the same dimensions produce
//! identical graphs.

use crate::ids::{Loc, PipId, SiteId, WireId};
use crate::types::Delay;
use crate::Architecture;
use std::collections::BTreeMap;

/// Number of sites in every tile: z0 logic, z1 flip-flop, z2 I/O.
pub const SITES_PER_TILE: i32 = 3;

/// Delay through every mesh pip.
const PIP_DELAY: Delay = Delay {
    min_ns: 0.05,
    typ_ns: 0.1,
    max_ns: 0.2,
};

#[derive(Debug)]
struct WireData {
    /// Tile column this wire belongs to.
    x: i32,
    /// Tile row this wire belongs to.
    y: i32,
    #[allow(dead_code)]
    name: String,
}

#[derive(Debug)]
struct PipData {
    src: WireId,
    dst: WireId,
}

/// The mesh grid fabric.
#[derive(Debug)]
pub struct MeshArch {
    width: i32,
    height: i32,
    wires: Vec<WireData>,
    pips: Vec<PipData>,
    /// Downhill pips per wire, ascending pip ID order by construction.
    pips_from: Vec<Vec<PipId>>,
    /// Hub wire per tile.
    hubs: Vec<WireId>,
    /// Input wire per site.
    site_in: Vec<WireId>,
    /// Output wire per site.
    site_out: Vec<WireId>,
}

impl MeshArch {
    /// Builds a mesh with the given grid dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "mesh dimensions must be positive, got {width}x{height}"
        );

        let tiles = (width * height) as usize;
        let sites = tiles * SITES_PER_TILE as usize;

        let mut arch = Self {
            width,
            height,
            wires: Vec::new(),
            pips: Vec::new(),
            pips_from: Vec::new(),
            hubs: Vec::with_capacity(tiles),
            site_in: Vec::with_capacity(sites),
            site_out: Vec::with_capacity(sites),
        };

        // Wires, row-major tile order: hub first, then in/out per site.
        for y in 0..height {
            for x in 0..width {
                let hub = arch.add_wire(x, y, format!("X{x}Y{y}_HUB"));
                arch.hubs.push(hub);
                for z in 0..SITES_PER_TILE {
                    let w_in = arch.add_wire(x, y, format!("X{x}Y{y}_Z{z}_I"));
                    let w_out = arch.add_wire(x, y, format!("X{x}Y{y}_Z{z}_O"));
                    arch.site_in.push(w_in);
                    arch.site_out.push(w_out);
                }
            }
        }

        // Pips, same tile order: local fanin/fanout, then hub-to-hub links.
        for y in 0..height {
            for x in 0..width {
                let tile = (y * width + x) as usize;
                let hub = arch.hubs[tile];
                for z in 0..SITES_PER_TILE {
                    let site = tile * SITES_PER_TILE as usize + z as usize;
                    arch.add_pip(arch.site_out[site], hub);
                    arch.add_pip(hub, arch.site_in[site]);
                }
                // Neighbor order fixed: north, east, south, west.
                for (dx, dy) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx >= 0 && nx < width && ny >= 0 && ny < height {
                        let neighbor = arch.hubs[(ny * width + nx) as usize];
                        arch.add_pip(hub, neighbor);
                    }
                }
            }
        }

        arch
    }

    /// Builds a mesh from a string-keyed configuration mapping.
    ///
    /// Recognized keys: `width`, `height` (default 8 each).
    ///
    /// # Panics
    ///
    /// Panics if a recognized key has an unparsable value; a malformed
    /// backend configuration is a startup programming error.
    pub fn from_args(args: &BTreeMap<String, String>) -> Self {
        let dim = |key: &str| -> i32 {
            args.get(key).map_or(8, |v| {
                v.parse()
                    .unwrap_or_else(|_| panic!("mesh: bad value {v:?} for {key:?}"))
            })
        };
        Self::new(dim("width"), dim("height"))
    }

    fn add_wire(&mut self, x: i32, y: i32, name: String) -> WireId {
        let id = WireId::from_raw(self.wires.len() as u32);
        self.wires.push(WireData { x, y, name });
        self.pips_from.push(Vec::new());
        id
    }

    fn add_pip(&mut self, src: WireId, dst: WireId) {
        let id = PipId::from_raw(self.pips.len() as u32);
        self.pips.push(PipData { src, dst });
        self.pips_from[src.as_raw() as usize].push(id);
    }

    fn wire_index(&self, wire: WireId) -> usize {
        let index = wire.as_raw() as usize;
        assert!(
            index < self.wires.len(),
            "foreign or out-of-range wire {wire} passed to mesh"
        );
        index
    }

    fn pip_index(&self, pip: PipId) -> usize {
        let index = pip.as_raw() as usize;
        assert!(
            index < self.pips.len(),
            "foreign or out-of-range pip {pip} passed to mesh"
        );
        index
    }

    fn site_index(&self, site: SiteId) -> usize {
        let index = site.as_raw() as usize;
        assert!(
            index < self.site_in.len(),
            "foreign or out-of-range site {site} passed to mesh"
        );
        index
    }

    fn is_perimeter(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }
}

impl Architecture for MeshArch {
    fn name(&self) -> &str {
        "mesh"
    }

    fn grid_dims(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn site_loc(&self, site: SiteId) -> Loc {
        let index = self.site_index(site) as i32;
        let tile = index / SITES_PER_TILE;
        Loc {
            x: tile % self.width,
            y: tile / self.width,
            z: index % SITES_PER_TILE,
        }
    }

    fn site_at(&self, loc: Loc) -> Option<SiteId> {
        if loc.x < 0 || loc.x >= self.width || loc.y < 0 || loc.y >= self.height {
            return None;
        }
        if loc.z < 0 || loc.z >= SITES_PER_TILE {
            return None;
        }
        let tile = loc.y * self.width + loc.x;
        Some(SiteId::from_raw((tile * SITES_PER_TILE + loc.z) as u32))
    }

    fn site_count(&self) -> u32 {
        self.site_in.len() as u32
    }

    fn wire_count(&self) -> u32 {
        self.wires.len() as u32
    }

    fn pip_count(&self) -> u32 {
        self.pips.len() as u32
    }

    fn pip_src_wire(&self, pip: PipId) -> WireId {
        self.pips[self.pip_index(pip)].src
    }

    fn pip_dst_wire(&self, pip: PipId) -> WireId {
        self.pips[self.pip_index(pip)].dst
    }

    fn pips_from(&self, wire: WireId) -> Vec<PipId> {
        self.pips_from[self.wire_index(wire)].clone()
    }

    fn site_source_wire(&self, site: SiteId) -> WireId {
        self.site_out[self.site_index(site)]
    }

    fn site_sink_wire(&self, site: SiteId) -> WireId {
        self.site_in[self.site_index(site)]
    }

    fn site_compatible(&self, site: SiteId, cell_type: &str) -> bool {
        let loc = self.site_loc(site);
        match loc.z {
            0 | 1 => matches!(cell_type, "LUT4" | "DFF"),
            _ => cell_type == "IOB",
        }
    }

    fn is_site_legal(&self, site: SiteId, cell_type: &str) -> bool {
        if !self.site_compatible(site, cell_type) {
            return false;
        }
        let loc = self.site_loc(site);
        match loc.z {
            // z1 pairs with the tile's register path: flip-flops only.
            1 => cell_type == "DFF",
            // I/O sites exist in every tile but only perimeter ones reach
            // a package pin.
            2 => self.is_perimeter(loc.x, loc.y),
            _ => true,
        }
    }

    fn pip_delay(&self, pip: PipId) -> Delay {
        self.pip_index(pip);
        PIP_DELAY
    }

    fn estimate_delay(&self, src: WireId, dst: WireId) -> Delay {
        let a = &self.wires[self.wire_index(src)];
        let b = &self.wires[self.wire_index(dst)];
        let hops = (a.x - b.x).abs() + (a.y - b.y).abs();
        // Any path between the tiles crosses at least one hub-to-hub pip
        // per grid step; local fanin/fanout pips are not counted so the
        // estimate stays a lower bound.
        Delay {
            min_ns: PIP_DELAY.min_ns * hops as f64,
            typ_ns: PIP_DELAY.typ_ns * hops as f64,
            max_ns: PIP_DELAY.max_ns * hops as f64,
        }
    }
}
