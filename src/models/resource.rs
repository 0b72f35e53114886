//! Resource model.
//!
//! A resource is one lane of the timeline: a person, room, or machine that
//! events are placed on. Resources are configured once and never change.

use serde::{Deserialize, Serialize};

use super::ResourceId;

/// A lane that events can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// Display label. Not required to be unique.
    #[serde(default)]
    pub title: String,
}

impl Resource {
    /// Creates a resource with an empty title.
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
        }
    }

    /// Sets the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
