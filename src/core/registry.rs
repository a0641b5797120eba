//! # Service registry: specs and the requirement graph.
//!
//! The registry is filled by [`Supervisor::register`](crate::Supervisor::register)
//! before the engine starts and is immutable afterwards. Validation happens
//! once, at init: every requirement must name a registered service and the
//! graph must be acyclic.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::graph;
use crate::service::{ServiceSpec, ServiceState};

/// Registered specs plus the requirement graph derived from them.
#[derive(Default)]
pub(crate) struct Registry {
    specs: HashMap<String, Arc<ServiceSpec>>,
    requirements: HashMap<String, Vec<String>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a spec; duplicate names are rejected.
    pub(crate) fn insert(&mut self, spec: ServiceSpec) -> Result<(), RegistryError> {
        let name = spec.name().to_string();
        if self.specs.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        self.requirements
            .insert(name.clone(), spec.requirements().to_vec());
        self.specs.insert(name, Arc::new(spec));
        Ok(())
    }

    /// Checks that the graph is closed under naming and acyclic.
    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        for (service, requirements) in &self.requirements {
            for requirement in requirements {
                if !self.specs.contains_key(requirement) {
                    return Err(RegistryError::UnknownRequirement {
                        service: service.clone(),
                        requirement: requirement.clone(),
                    });
                }
            }
        }
        if !graph::is_acyclic(&self.requirements) {
            return Err(RegistryError::RequirementCycle);
        }
        Ok(())
    }

    /// Returns all registered names, sorted ascending.
    pub(crate) fn names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.specs.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Seeds the authoritative state map: everything starts `Dead`.
    pub(crate) fn initial_states(&self) -> HashMap<String, ServiceState> {
        self.specs
            .keys()
            .map(|name| (name.clone(), ServiceState::Dead))
            .collect()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        HashMap<String, Arc<ServiceSpec>>,
        HashMap<String, Vec<String>>,
    ) {
        (self.specs, self.requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, requirements: &[&str]) -> ServiceSpec {
        ServiceSpec::new(name, "true").with_requirements(requirements.iter().copied())
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.insert(spec("a", &[])).unwrap();

        let err = registry.insert(spec("a", &[])).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { name } if name == "a"));
    }

    #[test]
    fn unknown_requirement_rejected_at_validate() {
        let mut registry = Registry::new();
        registry.insert(spec("a", &["ghost"])).unwrap();

        let err = registry.validate().unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownRequirement { service, requirement }
                if service == "a" && requirement == "ghost"
        ));
    }

    #[test]
    fn cycle_rejected_at_validate() {
        let mut registry = Registry::new();
        registry.insert(spec("a", &["b"])).unwrap();
        registry.insert(spec("b", &["a"])).unwrap();

        let err = registry.validate().unwrap_err();
        assert!(matches!(err, RegistryError::RequirementCycle));
    }

    #[test]
    fn valid_graph_passes_and_names_are_sorted() {
        let mut registry = Registry::new();
        registry.insert(spec("b", &["a"])).unwrap();
        registry.insert(spec("a", &[])).unwrap();
        registry.insert(spec("c", &["a", "b"])).unwrap();

        registry.validate().unwrap();
        assert_eq!(registry.names_sorted(), ["a", "b", "c"]);
        assert!(registry
            .initial_states()
            .values()
            .all(|state| *state == ServiceState::Dead));
    }
}
