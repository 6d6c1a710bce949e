//! Strength tags ordering binding proposals against each other.

use serde::{Deserialize, Serialize};

/// The priority of a binding, weakest to strongest.
///
/// The derived `Ord` (declaration order) is the one total order every
/// arbitration decision reuses: a bind request replaces an existing record
/// from a different occupant only when its strength is strictly greater.
/// `Locked` and `User` are pinned strengths — records carrying them are
/// never replaced by any bind and must be removed by an explicit unbind.
#[repr(u8)]
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub enum PlaceStrength {
    /// A tentative binding a pass expects to revisit.
    Weak = 0,
    /// A working binding produced by the placer or router.
    Strong = 1,
    /// A binding fixed by a finalization pass.
    Fixed = 2,
    /// A binding pinned by a prior finalization pass; never overridden.
    Locked = 3,
    /// A binding pinned by a user constraint; never overridden.
    User = 4,
}

impl PlaceStrength {
    /// Returns whether this strength pins its record against any override.
    pub fn is_pinned(self) -> bool {
        matches!(self, PlaceStrength::Locked | PlaceStrength::User)
    }
}

impl std::fmt::Display for PlaceStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlaceStrength::Weak => "weak",
            PlaceStrength::Strong => "strong",
            PlaceStrength::Fixed => "fixed",
            PlaceStrength::Locked => "locked",
            PlaceStrength::User => "user",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<u8> for PlaceStrength {
    type Error = u8;

    /// Converts a raw strength value from the foreign boundary; returns the
    /// offending value on failure.
    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(PlaceStrength::Weak),
            1 => Ok(PlaceStrength::Strong),
            2 => Ok(PlaceStrength::Fixed),
            3 => Ok(PlaceStrength::Locked),
            4 => Ok(PlaceStrength::User),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_weakest_to_strongest() {
        assert!(PlaceStrength::Weak < PlaceStrength::Strong);
        assert!(PlaceStrength::Strong < PlaceStrength::Fixed);
        assert!(PlaceStrength::Fixed < PlaceStrength::Locked);
        assert!(PlaceStrength::Locked < PlaceStrength::User);
    }

    #[test]
    fn pinned_strengths() {
        assert!(!PlaceStrength::Weak.is_pinned());
        assert!(!PlaceStrength::Strong.is_pinned());
        assert!(!PlaceStrength::Fixed.is_pinned());
        assert!(PlaceStrength::Locked.is_pinned());
        assert!(PlaceStrength::User.is_pinned());
    }

    #[test]
    fn try_from_roundtrip() {
        for s in [
            PlaceStrength::Weak,
            PlaceStrength::Strong,
            PlaceStrength::Fixed,
            PlaceStrength::Locked,
            PlaceStrength::User,
        ] {
            assert_eq!(PlaceStrength::try_from(s as u8), Ok(s));
        }
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(PlaceStrength::try_from(5), Err(5));
        assert_eq!(PlaceStrength::try_from(255), Err(255));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", PlaceStrength::Strong), "strong");
        assert_eq!(format!("{}", PlaceStrength::User), "user");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&PlaceStrength::Fixed).unwrap();
        let back: PlaceStrength = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PlaceStrength::Fixed);
    }
}
