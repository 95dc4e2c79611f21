//! Locator to role/target lookup.

use std::collections::HashMap;

use crate::assets::{AssetRequest, Role, Target};

/// Where a resolved asset goes once it arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub role: Role,
    pub target: Target,
}

/// Pending requests grouped by locator.
///
/// A locator may map to several bindings (one texture used as normal and
/// specular map, or one model file filling several slots).
#[derive(Debug, Default)]
pub struct AssetRegistry {
    entries: HashMap<String, Vec<Binding>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request. Returns `true` if the locator was not pending before,
    /// i.e. a load has to be started for it.
    ///
    /// Registering the exact same request twice keeps a single binding.
    pub fn register(&mut self, request: AssetRequest) -> bool {
        let binding = Binding {
            role: request.role,
            target: request.target,
        };
        match self.entries.get_mut(&request.locator) {
            Some(bindings) => {
                if !bindings.contains(&binding) {
                    bindings.push(binding);
                }
                false
            }
            None => {
                self.entries.insert(request.locator, vec![binding]);
                true
            }
        }
    }

    pub fn lookup(&self, locator: &str) -> &[Binding] {
        self.entries.get(locator).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove and return every binding registered for `locator`.
    pub fn take(&mut self, locator: &str) -> Vec<Binding> {
        self.entries.remove(locator).unwrap_or_default()
    }

    pub fn contains(&self, locator: &str) -> bool {
        self.entries.contains_key(locator)
    }

    /// Number of pending requests (not locators).
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::scene_graph::MaterialId;

    #[test]
    fn first_registration_starts_a_load() {
        let mut registry = AssetRegistry::new();
        assert!(registry.register(AssetRequest::diffuse("floor_diffuse.jpg", MaterialId(0))));
        assert!(registry.register(AssetRequest::normal_map("floor_normal.jpg", MaterialId(0))));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn shared_locator_fans_out() {
        let mut registry = AssetRegistry::new();
        assert!(registry.register(AssetRequest::normal_map("weave_normal.jpg", MaterialId(3))));
        assert!(!registry.register(AssetRequest::specular_map("weave_normal.jpg", MaterialId(3))));
        let roles: Vec<Role> = registry
            .lookup("weave_normal.jpg")
            .iter()
            .map(|binding| binding.role)
            .collect();
        assert_eq!(roles, vec![Role::NormalMap, Role::SpecularMap]);
    }

    #[test]
    fn duplicate_request_is_kept_once() {
        let mut registry = AssetRegistry::new();
        registry.register(AssetRequest::diffuse("a.jpg", MaterialId(0)));
        registry.register(AssetRequest::diffuse("a.jpg", MaterialId(0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn take_empties_the_locator() {
        let mut registry = AssetRegistry::new();
        registry.register(AssetRequest::diffuse("a.jpg", MaterialId(0)));
        assert_eq!(registry.take("a.jpg").len(), 1);
        assert!(registry.take("a.jpg").is_empty());
        assert!(registry.is_empty());
        assert!(registry.lookup("unused.jpg").is_empty());
    }
}
