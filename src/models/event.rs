//! Timed event model.
//!
//! An event occupies the half-open interval `[start, end)` on exactly one
//! resource lane. The `editable` and `resource_editable` flags gate which
//! gestures may change it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EventId, ResourceId};

/// An event placed on a resource lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Lane the event is assigned to.
    pub resource_id: ResourceId,
    /// Start instant (inclusive).
    pub start: DateTime<Utc>,
    /// End instant (exclusive).
    pub end: DateTime<Utc>,
    /// Display label.
    #[serde(default)]
    pub title: String,
    /// Whether move/resize may change `start`/`end`.
    #[serde(default = "default_true")]
    pub editable: bool,
    /// Whether a move may change `resource_id`.
    #[serde(default = "default_true")]
    pub resource_editable: bool,
}

fn default_true() -> bool {
    true
}

/// Composite `(event, resource)` key used to address a rendered event.
///
/// Formats as `event-{event_id}-resource-{resource_id}`, the test id the
/// rendering side attaches to each event element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Event part of the key.
    pub event_id: EventId,
    /// Resource part of the key.
    pub resource_id: ResourceId,
}

impl Event {
    /// Creates an editable event with an empty title.
    pub fn new(
        id: impl Into<EventId>,
        resource_id: impl Into<ResourceId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            start,
            end,
            title: String::new(),
            editable: true,
            resource_editable: true,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the `editable` flag.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Sets the `resource_editable` flag.
    pub fn with_resource_editable(mut self, resource_editable: bool) -> Self {
        self.resource_editable = resource_editable;
        self
    }

    /// Returns a copy moved to `resource_id` over `[start, end)`.
    pub fn moved_to(
        &self,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_id,
            start,
            end,
            ..self.clone()
        }
    }

    /// Returns a copy spanning `[start, end)` on the same lane.
    pub fn resized_to(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.moved_to(self.resource_id.clone(), start, end)
    }

    /// `end - start`. Negative for an invalid range.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `start < end`.
    #[inline]
    pub fn has_valid_range(&self) -> bool {
        self.start < self.end
    }

    /// Whether the time ranges of two events intersect.
    ///
    /// Ranges are half-open, so back-to-back events do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` has a different `start` or `end`.
    pub fn range_differs(&self, other: &Event) -> bool {
        self.start != other.start || self.end != other.end
    }

    /// Composite key for render addressing.
    pub fn render_key(&self) -> RenderKey {
        RenderKey::new(self.id.clone(), self.resource_id.clone())
    }
}

impl RenderKey {
    /// Creates a key from its parts.
    pub fn new(event_id: impl Into<EventId>, resource_id: impl Into<ResourceId>) -> Self {
        Self {
            event_id: event_id.into(),
            resource_id: resource_id.into(),
        }
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}-resource-{}", self.event_id, self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    #[test]
    fn test_event_builder_defaults() {
        let e = Event::new("E1", "R1", t(2), t(6)).with_title("Standup");
        assert!(e.editable);
        assert!(e.resource_editable);
        assert_eq!(e.title, "Standup");
        assert_eq!(e.duration(), Duration::hours(4));
        assert!(e.has_valid_range());
    }

    #[test]
    fn test_zero_duration_is_invalid() {
        let e = Event::new("E1", "R1", t(2), t(2));
        assert!(!e.has_valid_range());
    }

    #[test]
    fn test_moved_to_keeps_identity_fields() {
        let e = Event::new("E1", "R1", t(2), t(6))
            .with_title("Review")
            .with_editable(false);
        let moved = e.moved_to(ResourceId::from("R2"), t(3), t(7));
        assert_eq!(moved.id, e.id);
        assert_eq!(moved.title, "Review");
        assert!(!moved.editable);
        assert_eq!(moved.resource_id.as_str(), "R2");
        assert!(moved.range_differs(&e));

        let resized = e.resized_to(t(2), t(6));
        assert_eq!(resized, e);
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Event::new("A", "R1", t(0), t(2));
        let b = Event::new("B", "R1", t(2), t(4));
        let c = Event::new("C", "R1", t(1), t(3));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_render_key_format() {
        let e = Event::new("42ac", "f1a3", t(0), t(1));
        assert_eq!(e.render_key().to_string(), "event-42ac-resource-f1a3");
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{
            "id": "E1",
            "resourceId": "R1",
            "start": "2024-03-01T02:00:00Z",
            "end": "2024-03-01T06:00:00Z",
            "title": "An event to be drawn in the calendar timeline"
        }"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert_eq!(e.resource_id.as_str(), "R1");
        assert_eq!(e.start, t(2));
        assert!(e.editable);
        assert!(e.resource_editable);

        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["resourceEditable"], true);
    }
}
