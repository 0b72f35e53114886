//! Initial timeline state.
//!
//! A seed is the JSON document the host starts from: the lane list and the
//! events already on it, in the same shape the calendar widget takes.
//!
//! ```json
//! {
//!   "resources": [{ "id": "a59b98d6", "title": "Elliot" }],
//!   "events": [{
//!     "id": "42ac857c",
//!     "resourceId": "a59b98d6",
//!     "start": "2024-03-01T02:00:00Z",
//!     "end": "2024-03-01T06:00:00Z",
//!     "title": "An event to be drawn in the calendar timeline"
//!   }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DispatcherConfig;
use crate::dispatching::MutationDispatcher;
use crate::models::{Event, Resource};
use crate::registry::{RegistryError, ResourceRegistry};
use crate::store::EventStore;
use crate::validation::{validate_seed, validate_seed_overlaps, SeedError, SeedErrorKind};

/// Errors raised while loading a seed.
#[derive(Debug, thiserror::Error)]
pub enum SeedLoadError {
    /// Failed to read the seed file.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse the seed JSON.
    #[error("failed to parse seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The resource list is inconsistent.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// One or more events break an invariant.
    #[error("seed has {} invalid event(s): {}", .0.len(), first_message(.0))]
    Invalid(Vec<SeedError>),
}

fn first_message(errors: &[SeedError]) -> &str {
    errors.first().map_or("", |e| e.message.as_str())
}

/// Resources and events to start a timeline from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSeed {
    /// Lanes, in display order.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Existing events, in insertion order.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TimelineSeed {
    /// Parses a seed from JSON.
    pub fn from_json(json: &str) -> Result<Self, SeedLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a seed file.
    pub fn from_file(path: &Path) -> Result<Self, SeedLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Validates the seed and builds the registry and store.
    ///
    /// Overlapping events are accepted; use
    /// [`into_parts_with`](Self::into_parts_with) to load under a config
    /// that forbids double-booking.
    pub fn into_parts(self) -> Result<(ResourceRegistry, EventStore), SeedLoadError> {
        self.into_parts_with(&DispatcherConfig::default())
    }

    /// Validates the seed against `config` and builds the registry and store.
    ///
    /// With `allow_overlap = false`, overlapping events on a lane are
    /// rejected as well.
    pub fn into_parts_with(
        self,
        config: &DispatcherConfig,
    ) -> Result<(ResourceRegistry, EventStore), SeedLoadError> {
        let registry = ResourceRegistry::new(self.resources)?;
        validate_seed(&self.events, &registry).map_err(SeedLoadError::Invalid)?;
        if !config.allow_overlap {
            validate_seed_overlaps(&self.events).map_err(SeedLoadError::Invalid)?;
        }

        let store = EventStore::from_events(self.events).map_err(|e| {
            SeedLoadError::Invalid(vec![SeedError {
                kind: SeedErrorKind::DuplicateId,
                message: e.to_string(),
            }])
        })?;
        info!(
            resources = registry.len(),
            events = store.list().len(),
            "timeline seed loaded"
        );
        Ok((registry, store))
    }

    /// Validates the seed and wraps it in a dispatcher with default settings.
    pub fn into_dispatcher(self) -> Result<MutationDispatcher, SeedLoadError> {
        self.into_dispatcher_with(DispatcherConfig::default())
    }

    /// Validates the seed against `config` and wraps it in a dispatcher
    /// using that config.
    pub fn into_dispatcher_with(
        self,
        config: DispatcherConfig,
    ) -> Result<MutationDispatcher, SeedLoadError> {
        let (registry, store) = self.into_parts_with(&config)?;
        Ok(MutationDispatcher::new(registry, store).with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"{
        "resources": [
            { "id": "a59b98d6-3a5d-492f-95eb-d8b9b51d7817", "title": "Elliot" },
            { "id": "f1a3ed14-93ae-4090-9228-781734f64a5f", "title": "Billie" }
        ],
        "events": [{
            "id": "42ac857c-6836-4419-95d8-f37c364c9f38",
            "resourceId": "a59b98d6-3a5d-492f-95eb-d8b9b51d7817",
            "start": "2024-03-01T02:00:00Z",
            "end": "2024-03-01T06:00:00Z",
            "title": "An event to be drawn in the calendar timeline",
            "editable": true,
            "resourceEditable": true
        }]
    }"#;

    #[test]
    fn test_load_seed() {
        let (registry, store) = TimelineSeed::from_json(SEED).unwrap().into_parts().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();
        let seed = TimelineSeed::from_file(file.path()).unwrap();
        assert_eq!(seed.events.len(), 1);
        assert!(seed.into_dispatcher().is_ok());
    }

    #[test]
    fn test_empty_seed() {
        let (registry, store) = TimelineSeed::from_json("{}").unwrap().into_parts().unwrap();
        assert!(registry.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_seed_with_unknown_resource() {
        let seed = TimelineSeed::from_json(
            r#"{
                "resources": [{ "id": "A" }],
                "events": [{
                    "id": "E", "resourceId": "B",
                    "start": "2024-03-01T02:00:00Z", "end": "2024-03-01T06:00:00Z"
                }]
            }"#,
        )
        .unwrap();
        match seed.into_parts() {
            Err(SeedLoadError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, SeedErrorKind::UnknownResource);
            }
            other => panic!("expected invalid seed, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_with_duplicate_resource() {
        let seed = TimelineSeed::from_json(r#"{"resources": [{"id": "A"}, {"id": "A"}]}"#).unwrap();
        assert!(matches!(
            seed.into_parts(),
            Err(SeedLoadError::Registry(RegistryError::DuplicateResource(_)))
        ));
    }

    #[test]
    fn test_overlapping_seed_depends_on_config() {
        let json = r#"{
            "resources": [{ "id": "A" }],
            "events": [
                { "id": "E1", "resourceId": "A",
                  "start": "2024-03-01T02:00:00Z", "end": "2024-03-01T06:00:00Z" },
                { "id": "E2", "resourceId": "A",
                  "start": "2024-03-01T03:00:00Z", "end": "2024-03-01T04:00:00Z" }
            ]
        }"#;

        assert!(TimelineSeed::from_json(json).unwrap().into_dispatcher().is_ok());

        let strict = DispatcherConfig::default().with_allow_overlap(false);
        match TimelineSeed::from_json(json).unwrap().into_dispatcher_with(strict) {
            Err(SeedLoadError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, SeedErrorKind::Overlap);
            }
            Err(other) => panic!("expected overlap error, got {other}"),
            Ok(_) => panic!("expected overlap error"),
        }
    }

    #[test]
    fn test_seed_config_reaches_dispatcher() {
        let config = DispatcherConfig::default().with_default_title("Booking");
        let d = TimelineSeed::from_json(SEED)
            .unwrap()
            .into_dispatcher_with(config)
            .unwrap();
        assert_eq!(d.config().default_title, "Booking");
    }

    #[test]
    fn test_malformed_seed() {
        assert!(matches!(
            TimelineSeed::from_json("[1, 2"),
            Err(SeedLoadError::Json(_))
        ));
    }
}
