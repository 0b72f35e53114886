//! Mutation intents and their dispatcher.
//!
//! The widget translates finished gestures into [`Intent`]s. The
//! [`MutationDispatcher`] turns each intent into a whole candidate event,
//! validates it, and either commits a new snapshot or leaves the store as
//! it was. After every intent the current snapshot is handed to each
//! registered [`SnapshotSink`].
//!
//! # Usage
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use u_timeline::dispatching::{Intent, MutationDispatcher};
//! use u_timeline::models::{Event, RenderKey, Resource};
//! use u_timeline::registry::ResourceRegistry;
//! use u_timeline::store::EventStore;
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
//! let registry = ResourceRegistry::new(vec![Resource::new("A"), Resource::new("B")]).unwrap();
//! let store = EventStore::from_events(vec![
//!     Event::new("E", "A", t0 + Duration::hours(2), t0 + Duration::hours(6)),
//! ])
//! .unwrap();
//!
//! let mut dispatcher = MutationDispatcher::new(registry, store);
//! let snapshot = dispatcher
//!     .dispatch(Intent::Drop {
//!         event_id: "E".into(),
//!         target_resource_id: "B".into(),
//!         new_start: t0 + Duration::hours(2),
//!         new_end: t0 + Duration::hours(6),
//!     })
//!     .unwrap();
//! assert!(snapshot.contains_key(&RenderKey::new("E", "B")));
//! ```

mod engine;
mod id_gen;

pub use engine::MutationDispatcher;
pub use id_gen::{IdGenerator, SequenceIdGenerator, UuidIdGenerator};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EventId, ResourceId};
use crate::store::{Snapshot, StoreError};
use crate::validation::ValidationError;

/// A request to mutate the schedule, produced by a finished gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// An event was dragged onto a lane.
    Drop {
        /// Event being moved.
        event_id: EventId,
        /// Lane it was dropped on.
        target_resource_id: ResourceId,
        /// New start.
        new_start: DateTime<Utc>,
        /// New end.
        new_end: DateTime<Utc>,
    },
    /// An event edge was dragged.
    Resize {
        /// Event being resized.
        event_id: EventId,
        /// New start.
        new_start: DateTime<Utc>,
        /// New end.
        new_end: DateTime<Utc>,
    },
    /// A time range was marked. `resource_id` is `None` when the selection
    /// did not fall on a lane.
    Select {
        /// Lane the selection was made on.
        resource_id: Option<ResourceId>,
        /// Selection start as reported by the widget.
        start_str: String,
        /// Selection end as reported by the widget.
        end_str: String,
    },
}

/// Reason an intent was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The intent references an event that does not exist.
    #[error("event not found: {0}")]
    NotFound(EventId),
    /// The candidate event failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store refused the commit.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A selection boundary could not be parsed.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    /// A selection was made outside any lane.
    #[error("selection has no resource")]
    NoResourceSelected,
    /// Every generated id collided with an existing event.
    #[error("no unused event id after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of ids tried.
        attempts: u32,
    },
}

/// Receiver of published snapshots (the rendering side).
pub trait SnapshotSink {
    /// Called once per intent with the store's current snapshot and, if the
    /// intent was rejected, the reason.
    fn publish(&mut self, snapshot: &Snapshot, rejection: Option<&DispatchError>);
}

/// Parses a selection boundary.
///
/// Accepts RFC 3339 (`2024-03-01T02:00:00Z`, `2024-03-01T02:00:00+09:00`),
/// a local date-time without offset (`2024-03-01T02:00:00`, read as UTC),
/// and a bare date (`2024-03-01`, midnight UTC) as emitted for all-day
/// selections.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, DispatchError> {
    let trimmed = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DispatchError::InvalidTimestamp(value.to_owned()))
}
