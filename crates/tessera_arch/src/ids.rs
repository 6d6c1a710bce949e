//! Opaque ID newtypes for device resources.
//!
//! [`SiteId`], [`WireId`], and [`PipId`] are thin `u32` wrappers addressing
//! placement sites, routing wires, and programmable interconnect points.
//! They are `Copy`, `Hash`, `Ord`, and `Serialize`/`Deserialize`. The strict
//! total order backs deterministic iteration and tie-breaking; callers must
//! treat the raw value as opaque — only the architecture that produced an ID
//! may interpret it.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a placement site on the device.
    SiteId
);

define_id!(
    /// Opaque, copyable ID for a routing wire in the interconnect fabric.
    WireId
);

define_id!(
    /// Opaque, copyable ID for a programmable interconnect point.
    PipId
);

/// A position in the device grid: tile column, tile row, and sub-site index.
///
/// Cluster placement applies fixed `Loc` offsets to a root site's location,
/// so the fields are signed even though on-device positions are
/// non-negative.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Loc {
    /// Tile column (0-based, left to right).
    pub x: i32,
    /// Tile row (0-based, bottom to top).
    pub y: i32,
    /// Sub-site index within the tile.
    pub z: i32,
}

impl Loc {
    /// Creates a new location.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this location displaced by the given offsets.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl std::fmt::Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X{}Y{}Z{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn site_id_roundtrip() {
        let id = SiteId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn wire_id_roundtrip() {
        let id = WireId::from_raw(99);
        assert_eq!(id.as_raw(), 99);
    }

    #[test]
    fn pip_id_roundtrip() {
        let id = PipId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
    }

    #[test]
    fn id_equality() {
        let a = SiteId::from_raw(3);
        let b = SiteId::from_raw(3);
        let c = SiteId::from_raw(4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_total_order() {
        let mut ids = vec![
            WireId::from_raw(9),
            WireId::from_raw(1),
            WireId::from_raw(5),
        ];
        ids.sort();
        assert_eq!(ids[0].as_raw(), 1);
        assert_eq!(ids[2].as_raw(), 9);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(PipId::from_raw(1));
        set.insert(PipId::from_raw(2));
        set.insert(PipId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = SiteId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: SiteId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn id_display() {
        let id = WireId::from_raw(42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn loc_offset() {
        let loc = Loc::new(3, 4, 1);
        let moved = loc.offset(-1, 2, 0);
        assert_eq!(moved, Loc::new(2, 6, 1));
    }

    #[test]
    fn loc_order_is_lexicographic() {
        assert!(Loc::new(0, 5, 5) < Loc::new(1, 0, 0));
        assert!(Loc::new(1, 0, 5) < Loc::new(1, 1, 0));
        assert!(Loc::new(1, 1, 0) < Loc::new(1, 1, 1));
    }

    #[test]
    fn loc_display() {
        assert_eq!(format!("{}", Loc::new(2, 7, 1)), "X2Y7Z1");
    }
}
