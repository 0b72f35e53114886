//! Resource registry.
//!
//! The fixed set of lanes events may be assigned to. Built once from
//! configuration; read-only afterwards.

use std::collections::HashMap;

use crate::models::{Resource, ResourceId};

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two resources share an id.
    #[error("duplicate resource id: {0}")]
    DuplicateResource(ResourceId),
}

/// Immutable lookup table of resources, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
    index: HashMap<ResourceId, usize>,
}

impl ResourceRegistry {
    /// Builds a registry, rejecting duplicate ids.
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for resource in resources {
            if registry.index.contains_key(&resource.id) {
                return Err(RegistryError::DuplicateResource(resource.id));
            }
            registry
                .index
                .insert(resource.id.clone(), registry.resources.len());
            registry.resources.push(resource);
        }
        Ok(registry)
    }

    /// Finds a resource by id.
    pub fn lookup(&self, id: &ResourceId) -> Option<&Resource> {
        self.index.get(id).and_then(|&i| self.resources.get(i))
    }

    /// Whether a resource with this id exists.
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// Resources in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the registry has no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry = ResourceRegistry::new(vec![
            Resource::new("A").with_title("Elliot"),
            Resource::new("B").with_title("Billie"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup(&ResourceId::from("B")).map(|r| r.title.as_str()),
            Some("Billie")
        );
        assert!(registry.lookup(&ResourceId::from("C")).is_none());
        assert!(registry.contains(&ResourceId::from("A")));
    }

    #[test]
    fn test_iteration_keeps_configuration_order() {
        let registry =
            ResourceRegistry::new(vec![Resource::new("Z"), Resource::new("A")]).unwrap();
        let ids: Vec<&str> = registry.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "A"]);
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let err = ResourceRegistry::new(vec![Resource::new("A"), Resource::new("A")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateResource(ResourceId::from("A")));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ResourceRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }
}
