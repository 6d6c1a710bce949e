//! The logical design container: cells, nets, and pins.
//!
//! A [`Design`] is the flat netlist view the engine places and routes.
//! Cells carry an architecture-interpreted type tag and a set of named
//! pins; nets connect one driver pin to a set of sink pins. The design
//! owns these records for the lifetime of a run; placement state (a cell's
//! site) lives here, while resource occupancy lives in the
//! [`BindingTable`](crate::binding::BindingTable).

use crate::ids::{CellId, NetId, PinId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessera_arch::SiteId;

/// The direction of a pin as seen from its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// The pin consumes a signal.
    Input,
    /// The pin produces a signal.
    Output,
}

/// A logical design element mapped onto one device site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell.
    pub id: CellId,
    /// The instance name of this cell.
    pub name: String,
    /// The cell type tag, interpreted by the architecture (e.g., "LUT4").
    pub cell_type: String,
    /// The site this cell is currently placed at, if any.
    pub placement: Option<SiteId>,
    /// The pins belonging to this cell, in creation order.
    pub pins: Vec<PinId>,
}

/// A connection point on a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// The unique ID of this pin.
    pub id: PinId,
    /// The pin name within its cell (e.g., "D", "Q").
    pub name: String,
    /// The direction of this pin.
    pub direction: PortDirection,
    /// The cell this pin belongs to.
    pub cell: CellId,
    /// The net this pin is connected to, if any.
    pub net: Option<NetId>,
}

/// A logical signal: one driver pin fanning out to sink pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// The name of this net.
    pub name: String,
    /// The pin driving this net, if connected.
    pub driver: Option<PinId>,
    /// The pins this net fans out to.
    pub sinks: Vec<PinId>,
}

/// The flat design container for place and route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// All cells in the design.
    pub cells: Vec<Cell>,
    /// All nets in the design.
    pub nets: Vec<Net>,
    /// All pins in the design.
    pub pins: Vec<Pin>,
    /// Auxiliary index: cell name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub cell_by_name: HashMap<String, CellId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub net_by_name: HashMap<String, NetId>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            nets: Vec::new(),
            pins: Vec::new(),
            cell_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds an unplaced cell with the given name and type, returning its ID.
    pub fn add_cell(&mut self, name: impl Into<String>, cell_type: impl Into<String>) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        let name = name.into();
        self.cell_by_name.insert(name.clone(), id);
        self.cells.push(Cell {
            id,
            name,
            cell_type: cell_type.into(),
            placement: None,
            pins: Vec::new(),
        });
        id
    }

    /// Adds a pin to the given cell, returning the pin's ID.
    pub fn add_pin(
        &mut self,
        cell: CellId,
        name: impl Into<String>,
        direction: PortDirection,
    ) -> PinId {
        let id = PinId::from_raw(self.pins.len() as u32);
        self.pins.push(Pin {
            id,
            name: name.into(),
            direction,
            cell,
            net: None,
        });
        self.cell_mut(cell).pins.push(id);
        id
    }

    /// Adds a net connecting the given driver pin to the given sinks,
    /// returning the net's ID. The pins' net references are updated.
    pub fn add_net(
        &mut self,
        name: impl Into<String>,
        driver: Option<PinId>,
        sinks: Vec<PinId>,
    ) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        let name = name.into();
        self.net_by_name.insert(name.clone(), id);
        if let Some(driver) = driver {
            self.pin_mut(driver).net = Some(id);
        }
        for &sink in &sinks {
            self.pin_mut(sink).net = Some(id);
        }
        self.nets.push(Net {
            id,
            name,
            driver,
            sinks,
        });
        id
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the cell with the given ID.
    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the pin with the given ID.
    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id.as_raw() as usize]
    }

    /// Returns the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the number of pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Returns whether all cells have been placed.
    pub fn is_fully_placed(&self) -> bool {
        self.cells.iter().all(|c| c.placement.is_some())
    }

    /// Returns the number of placed cells.
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.placement.is_some()).count()
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.cell_by_name.clear();
        for (i, cell) in self.cells.iter().enumerate() {
            self.cell_by_name
                .insert(cell.name.clone(), CellId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), NetId::from_raw(i as u32));
        }
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cell_design() -> Design {
        let mut design = Design::new();
        let lut = design.add_cell("lut_0", "LUT4");
        let ff = design.add_cell("ff_0", "DFF");
        let out = design.add_pin(lut, "O", PortDirection::Output);
        let din = design.add_pin(ff, "D", PortDirection::Input);
        design.add_net("n_0", Some(out), vec![din]);
        design
    }

    #[test]
    fn empty_design() {
        let design = Design::new();
        assert_eq!(design.cell_count(), 0);
        assert_eq!(design.net_count(), 0);
        assert_eq!(design.pin_count(), 0);
        assert!(design.is_fully_placed());
    }

    #[test]
    fn add_and_lookup() {
        let design = two_cell_design();
        assert_eq!(design.cell_count(), 2);
        assert_eq!(design.pin_count(), 2);
        assert_eq!(design.net_count(), 1);
        assert_eq!(design.cell(CellId::from_raw(0)).name, "lut_0");
        assert_eq!(design.cell_by_name["ff_0"], CellId::from_raw(1));
        assert_eq!(design.net_by_name["n_0"], NetId::from_raw(0));
    }

    #[test]
    fn pins_wired_to_cell_and_net() {
        let design = two_cell_design();
        let net = design.net(NetId::from_raw(0));
        let driver = design.pin(net.driver.unwrap());
        assert_eq!(driver.cell, CellId::from_raw(0));
        assert_eq!(driver.net, Some(net.id));
        assert_eq!(net.sinks.len(), 1);
        assert_eq!(design.pin(net.sinks[0]).net, Some(net.id));
        assert_eq!(design.cell(CellId::from_raw(0)).pins.len(), 1);
    }

    #[test]
    fn placement_tracking() {
        let mut design = two_cell_design();
        assert!(!design.is_fully_placed());
        assert_eq!(design.placed_count(), 0);

        design.cell_mut(CellId::from_raw(0)).placement = Some(SiteId::from_raw(3));
        assert_eq!(design.placed_count(), 1);
        design.cell_mut(CellId::from_raw(1)).placement = Some(SiteId::from_raw(4));
        assert!(design.is_fully_placed());
    }

    #[test]
    fn undriven_net() {
        let mut design = Design::new();
        let cell = design.add_cell("c", "DFF");
        let pin = design.add_pin(cell, "D", PortDirection::Input);
        let net = design.add_net("floating", None, vec![pin]);
        assert!(design.net(net).driver.is_none());
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let design = two_cell_design();
        let json = serde_json::to_string(&design).unwrap();
        let mut restored: Design = serde_json::from_str(&json).unwrap();
        assert!(restored.cell_by_name.is_empty());
        restored.rebuild_indices();
        assert_eq!(restored.cell_by_name["lut_0"], CellId::from_raw(0));
        assert_eq!(restored.net_by_name["n_0"], NetId::from_raw(0));
        assert_eq!(restored.cell_count(), 2);
    }
}
