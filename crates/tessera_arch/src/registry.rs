//! Name-keyed catalog of architecture backends.
//!
//! The registry is constructed once at process start and populated by an
//! explicit list of factory registrations supplied by the caller; there is
//! no self-registering static list, so backend discovery has no hidden
//! initialization-order dependency. Lookup is by exact name match.

use crate::mesh::MeshArch;
use crate::Architecture;
use std::collections::BTreeMap;

/// A factory producing an architecture instance from a string-keyed
/// configuration mapping.
///
/// A factory that cannot honor its configuration panics (a startup
/// programming error) rather than returning a degraded instance.
pub type ArchFactory = fn(&BTreeMap<String, String>) -> Box<dyn Architecture>;

/// A process-wide catalog of named architecture backends.
///
/// Intended to be built once at startup and treated as read-only for the
/// remainder of the process.
#[derive(Default)]
pub struct ArchitectureRegistry {
    entries: Vec<(String, ArchFactory)>,
}

impl ArchitectureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a backend under a unique name.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered. Duplicate names are a
    /// startup-time programming error, not a runtime condition.
    pub fn register(&mut self, name: &str, factory: ArchFactory) {
        assert!(
            !self.entries.iter().any(|(n, _)| n == name),
            "architecture {name:?} registered twice"
        );
        self.entries.push((name.to_string(), factory));
    }

    /// Creates an architecture instance by exact name match.
    ///
    /// Returns `None` if no backend with the given name is registered;
    /// an unknown architecture is a normal, reportable condition.
    pub fn create(
        &self,
        name: &str,
        args: &BTreeMap<String, String>,
    ) -> Option<Box<dyn Architecture>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory(args))
    }

    /// Returns the registered names, comma-joined in registration order,
    /// for diagnostic and help output.
    pub fn list(&self) -> String {
        let names: Vec<&str> = self.entries.iter().map(|(n, _)| n.as_str()).collect();
        names.join(", ")
    }

    /// Returns the number of registered backends.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns a registry pre-populated with the backends compiled into this
/// crate.
pub fn builtin_registry() -> ArchitectureRegistry {
    let mut registry = ArchitectureRegistry::new();
    registry.register("mesh", |args| Box::new(MeshArch::from_args(args)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SiteId;
    use crate::types::Delay;
    use crate::{Loc, PipId, WireId};

    #[derive(Debug)]
    struct NullArch;

    impl Architecture for NullArch {
        fn name(&self) -> &str {
            "null"
        }
        fn grid_dims(&self) -> (i32, i32) {
            (0, 0)
        }
        fn site_loc(&self, _site: SiteId) -> Loc {
            Loc::default()
        }
        fn site_at(&self, _loc: Loc) -> Option<SiteId> {
            None
        }
        fn site_count(&self) -> u32 {
            0
        }
        fn wire_count(&self) -> u32 {
            0
        }
        fn pip_count(&self) -> u32 {
            0
        }
        fn pip_src_wire(&self, _pip: PipId) -> WireId {
            unreachable!()
        }
        fn pip_dst_wire(&self, _pip: PipId) -> WireId {
            unreachable!()
        }
        fn pips_from(&self, _wire: WireId) -> Vec<PipId> {
            Vec::new()
        }
        fn site_source_wire(&self, _site: SiteId) -> WireId {
            unreachable!()
        }
        fn site_sink_wire(&self, _site: SiteId) -> WireId {
            unreachable!()
        }
        fn site_compatible(&self, _site: SiteId, _cell_type: &str) -> bool {
            false
        }
        fn is_site_legal(&self, _site: SiteId, _cell_type: &str) -> bool {
            false
        }
        fn pip_delay(&self, _pip: PipId) -> Delay {
            Delay::ZERO
        }
        fn estimate_delay(&self, _src: WireId, _dst: WireId) -> Delay {
            Delay::ZERO
        }
    }

    fn null_factory(_args: &BTreeMap<String, String>) -> Box<dyn Architecture> {
        Box::new(NullArch)
    }

    #[test]
    fn empty_registry() {
        let registry = ArchitectureRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.list(), "");
        assert!(registry.create("anything", &BTreeMap::new()).is_none());
    }

    #[test]
    fn register_and_create() {
        let mut registry = ArchitectureRegistry::new();
        registry.register("null", null_factory);
        let arch = registry.create("null", &BTreeMap::new()).unwrap();
        assert_eq!(arch.name(), "null");
    }

    #[test]
    fn create_unknown_is_none_not_panic() {
        let mut registry = ArchitectureRegistry::new();
        registry.register("null", null_factory);
        assert!(registry.create("nonexistent", &BTreeMap::new()).is_none());
    }

    #[test]
    fn exact_name_match_only() {
        let mut registry = ArchitectureRegistry::new();
        registry.register("null", null_factory);
        assert!(registry.create("Null", &BTreeMap::new()).is_none());
        assert!(registry.create("null ", &BTreeMap::new()).is_none());
    }

    #[test]
    fn list_joins_in_registration_order() {
        let mut registry = ArchitectureRegistry::new();
        registry.register("null", null_factory);
        registry.register("other", null_factory);
        assert_eq!(registry.list(), "null, other");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_name_panics() {
        let mut registry = ArchitectureRegistry::new();
        registry.register("null", null_factory);
        registry.register("null", null_factory);
    }

    #[test]
    fn factory_receives_args() {
        let mut registry = builtin_registry();
        registry.register("null", null_factory);

        let mut args = BTreeMap::new();
        args.insert("width".to_string(), "4".to_string());
        args.insert("height".to_string(), "3".to_string());
        let arch = registry.create("mesh", &args).unwrap();
        assert_eq!(arch.grid_dims(), (4, 3));
    }
}
