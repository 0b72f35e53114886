//! Event validation.
//!
//! Two entry points:
//! - [`Validator`] checks one candidate event produced by a mutation,
//!   stopping at the first failure.
//! - [`validate_seed`] checks a whole initial collection and reports every
//!   problem it finds.
//!
//! Checks applied to a candidate, in order:
//! 1. The resource exists in the registry
//! 2. `start < end`
//! 3. A non-editable event keeps its range
//! 4. A non-resource-editable event keeps its lane
//! 5. (opt-in) No overlap with another event on the same lane

use std::collections::HashSet;

use crate::models::{Event, EventId, ResourceId};
use crate::registry::ResourceRegistry;
use crate::store::Snapshot;

/// Reason a candidate event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The event references a resource that is not registered.
    #[error("unknown resource: {0}")]
    UnknownResource(ResourceId),
    /// `start` is not strictly before `end`.
    #[error("invalid range for event {event_id}: start {start} is not before end {end}")]
    InvalidRange {
        /// Offending event.
        event_id: EventId,
        /// Candidate start (RFC 3339).
        start: String,
        /// Candidate end (RFC 3339).
        end: String,
    },
    /// The event's range is locked.
    #[error("event {0} is not editable")]
    NotEditable(EventId),
    /// The event's lane is locked.
    #[error("event {0} cannot change resource")]
    ResourceNotEditable(EventId),
    /// The event would overlap another event on the same lane.
    #[error("event {event_id} overlaps {other} on resource {resource_id}")]
    Overlap {
        /// Candidate event.
        event_id: EventId,
        /// Event already occupying the slot.
        other: EventId,
        /// Lane on which the overlap occurs.
        resource_id: ResourceId,
    },
}

/// Checks candidate events against the registry and their prior version.
///
/// Pure: holds only borrowed, read-only inputs.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a ResourceRegistry,
    occupied: Option<&'a Snapshot>,
}

impl<'a> Validator<'a> {
    /// Creates a validator. Double-booking is permitted.
    pub fn new(registry: &'a ResourceRegistry) -> Self {
        Self {
            registry,
            occupied: None,
        }
    }

    /// Rejects candidates that overlap an event in `snapshot` on the same lane.
    ///
    /// Applies to candidates only. Overlaps already present in `snapshot`
    /// are caught at load time by [`validate_seed_overlaps`].
    pub fn deny_overlap(mut self, snapshot: &'a Snapshot) -> Self {
        self.occupied = Some(snapshot);
        self
    }

    /// Validates `candidate`, the proposed new version of `prior`.
    ///
    /// Pass `prior = None` for a newly created event. Returns the candidate
    /// unchanged on success.
    pub fn validate(
        &self,
        candidate: Event,
        prior: Option<&Event>,
    ) -> Result<Event, ValidationError> {
        if !self.registry.contains(&candidate.resource_id) {
            return Err(ValidationError::UnknownResource(candidate.resource_id));
        }

        if !candidate.has_valid_range() {
            return Err(ValidationError::InvalidRange {
                event_id: candidate.id,
                start: candidate.start.to_rfc3339(),
                end: candidate.end.to_rfc3339(),
            });
        }

        if let Some(prior) = prior {
            if !prior.editable && prior.range_differs(&candidate) {
                return Err(ValidationError::NotEditable(candidate.id));
            }
            if !prior.resource_editable && prior.resource_id != candidate.resource_id {
                return Err(ValidationError::ResourceNotEditable(candidate.id));
            }
        }

        if let Some(snapshot) = self.occupied {
            let clash = snapshot
                .events_for_resource(&candidate.resource_id)
                .find(|other| other.id != candidate.id && other.overlaps(&candidate));
            if let Some(other) = clash {
                return Err(ValidationError::Overlap {
                    event_id: candidate.id.clone(),
                    other: other.id.clone(),
                    resource_id: candidate.resource_id.clone(),
                });
            }
        }

        Ok(candidate)
    }
}

/// A problem found in an initial event collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedError {
    /// Error category.
    pub kind: SeedErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of seed errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedErrorKind {
    /// Two events share the same id.
    DuplicateId,
    /// An event references a resource that doesn't exist.
    UnknownResource,
    /// An event ends at or before its start.
    InvalidRange,
    /// Two events on the same lane overlap.
    Overlap,
}

impl SeedError {
    fn new(kind: SeedErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SeedError {}

/// Validates an initial event collection.
///
/// Checks:
/// 1. No duplicate event IDs
/// 2. Every event references a registered resource
/// 3. Every event has `start < end`
///
/// Editability is not checked: there is no prior version to compare with.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_seed(
    events: &[Event],
    registry: &ResourceRegistry,
) -> Result<(), Vec<SeedError>> {
    let mut errors = Vec::new();
    let mut event_ids = HashSet::new();

    for event in events {
        if !event_ids.insert(&event.id) {
            errors.push(SeedError::new(
                SeedErrorKind::DuplicateId,
                format!("Duplicate event ID: {}", event.id),
            ));
        }

        if !registry.contains(&event.resource_id) {
            errors.push(SeedError::new(
                SeedErrorKind::UnknownResource,
                format!(
                    "Event '{}' references unknown resource '{}'",
                    event.id, event.resource_id
                ),
            ));
        }

        if !event.has_valid_range() {
            errors.push(SeedError::new(
                SeedErrorKind::InvalidRange,
                format!(
                    "Event '{}' ends at {} which is not after its start {}",
                    event.id,
                    event.end.to_rfc3339(),
                    event.start.to_rfc3339()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that no two events on the same lane overlap.
///
/// Only needed when double-booking is disabled. Reports each overlapping
/// pair once, in insertion order.
pub fn validate_seed_overlaps(events: &[Event]) -> Result<(), Vec<SeedError>> {
    let mut errors = Vec::new();

    for (i, event) in events.iter().enumerate() {
        for other in &events[i + 1..] {
            if other.resource_id == event.resource_id && other.overlaps(event) {
                errors.push(SeedError::new(
                    SeedErrorKind::Overlap,
                    format!(
                        "Events '{}' and '{}' overlap on resource '{}'",
                        event.id, other.id, event.resource_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resource;
    use crate::store::EventStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn sample_registry() -> ResourceRegistry {
        ResourceRegistry::new(vec![
            Resource::new("A").with_title("Elliot"),
            Resource::new("B").with_title("Billie"),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_candidate() {
        let registry = sample_registry();
        let prior = Event::new("E1", "A", t(2), t(6));
        let candidate = prior.moved_to(ResourceId::from("B"), t(3), t(7));
        let ok = Validator::new(&registry)
            .validate(candidate.clone(), Some(&prior))
            .unwrap();
        assert_eq!(ok, candidate);
    }

    #[test]
    fn test_unknown_resource() {
        let registry = sample_registry();
        let err = Validator::new(&registry)
            .validate(Event::new("E1", "Z", t(0), t(1)), None)
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownResource(ResourceId::from("Z")));
    }

    #[test]
    fn test_invalid_range() {
        let registry = sample_registry();
        let validator = Validator::new(&registry);

        let reversed = validator
            .validate(Event::new("E1", "A", t(6), t(2)), None)
            .unwrap_err();
        assert!(matches!(reversed, ValidationError::InvalidRange { .. }));

        let empty = validator
            .validate(Event::new("E1", "A", t(2), t(2)), None)
            .unwrap_err();
        assert!(matches!(empty, ValidationError::InvalidRange { .. }));
    }

    #[test]
    fn test_unknown_resource_checked_before_range() {
        let registry = sample_registry();
        let err = Validator::new(&registry)
            .validate(Event::new("E1", "Z", t(6), t(2)), None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownResource(_)));
    }

    #[test]
    fn test_not_editable() {
        let registry = sample_registry();
        let prior = Event::new("E1", "A", t(2), t(6)).with_editable(false);
        let validator = Validator::new(&registry);

        let err = validator
            .validate(prior.resized_to(t(2), t(7)), Some(&prior))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotEditable(EventId::from("E1")));

        // Lane change with the same range is still allowed.
        let moved = prior.moved_to(ResourceId::from("B"), t(2), t(6));
        assert!(validator.validate(moved, Some(&prior)).is_ok());
    }

    #[test]
    fn test_resource_not_editable() {
        let registry = sample_registry();
        let prior = Event::new("E1", "A", t(2), t(6)).with_resource_editable(false);
        let validator = Validator::new(&registry);

        let err = validator
            .validate(prior.moved_to(ResourceId::from("B"), t(2), t(6)), Some(&prior))
            .unwrap_err();
        assert_eq!(err, ValidationError::ResourceNotEditable(EventId::from("E1")));

        assert!(validator
            .validate(prior.resized_to(t(1), t(6)), Some(&prior))
            .is_ok());
    }

    #[test]
    fn test_not_editable_checked_before_resource() {
        let registry = sample_registry();
        let prior = Event::new("E1", "A", t(2), t(6))
            .with_editable(false)
            .with_resource_editable(false);
        let err = Validator::new(&registry)
            .validate(prior.moved_to(ResourceId::from("B"), t(3), t(7)), Some(&prior))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotEditable(_)));
    }

    #[test]
    fn test_overlap_permitted_by_default() {
        let registry = sample_registry();
        assert!(Validator::new(&registry)
            .validate(Event::new("E2", "A", t(3), t(4)), None)
            .is_ok());
    }

    #[test]
    fn test_overlap_denied_when_enabled() {
        let registry = sample_registry();
        let store = EventStore::from_events(vec![Event::new("E1", "A", t(2), t(6))]).unwrap();
        let snapshot = store.list();
        let validator = Validator::new(&registry).deny_overlap(&snapshot);

        let err = validator
            .validate(Event::new("E2", "A", t(3), t(4)), None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Overlap { ref other, .. } if other.as_str() == "E1"));

        // Other lane, adjacent slot, and the event itself do not clash.
        assert!(validator.validate(Event::new("E2", "B", t(3), t(4)), None).is_ok());
        assert!(validator.validate(Event::new("E2", "A", t(6), t(7)), None).is_ok());
        let prior = Event::new("E1", "A", t(2), t(6));
        assert!(validator
            .validate(prior.resized_to(t(3), t(6)), Some(&prior))
            .is_ok());
    }

    #[test]
    fn test_valid_seed() {
        let registry = sample_registry();
        let events = vec![
            Event::new("E1", "A", t(2), t(6)),
            Event::new("E2", "B", t(0), t(1)),
        ];
        assert!(validate_seed(&events, &registry).is_ok());
    }

    #[test]
    fn test_seed_overlaps() {
        let events = vec![
            Event::new("E1", "A", t(2), t(6)),
            Event::new("E2", "A", t(3), t(4)),
            Event::new("E3", "A", t(6), t(7)),
            Event::new("E4", "B", t(2), t(6)),
        ];
        let errors = validate_seed_overlaps(&events).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, SeedErrorKind::Overlap);
        assert!(errors[0].message.contains("'E1' and 'E2'"));

        assert!(validate_seed_overlaps(&events[2..]).is_ok());
    }

    #[test]
    fn test_seed_collects_all_errors() {
        let registry = sample_registry();
        let events = vec![
            Event::new("E1", "A", t(2), t(6)),
            Event::new("E1", "A", t(7), t(8)),
            Event::new("E2", "NOPE", t(0), t(1)),
            Event::new("E3", "B", t(5), t(1)),
        ];
        let errors = validate_seed(&events, &registry).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.kind == SeedErrorKind::DuplicateId));
        assert!(errors
            .iter()
            .any(|e| e.kind == SeedErrorKind::UnknownResource && e.message.contains("NOPE")));
        assert!(errors.iter().any(|e| e.kind == SeedErrorKind::InvalidRange));
    }
}
