//! Event store with copy-on-write snapshots.
//!
//! The store holds one current [`Snapshot`]. `replace` and `insert` never
//! touch it: they build a new snapshot that shares every unchanged event
//! (`Arc`) with the old one and hand it back. The dispatcher decides
//! whether to [`commit`](EventStore::commit) it. A snapshot that has been
//! handed to a reader stays valid and unchanged no matter what is
//! committed later.

use std::sync::Arc;

use crate::models::{Event, EventId, RenderKey, ResourceId};

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No event has the given id.
    #[error("event not found: {0}")]
    NotFound(EventId),
    /// An event with the given id already exists.
    #[error("duplicate event id: {0}")]
    DuplicateId(EventId),
    /// A `replace` updater tried to change the event's id.
    #[error("updater changed event id from {from} to {to}")]
    IdChanged {
        /// Id of the event being replaced.
        from: EventId,
        /// Id returned by the updater.
        to: EventId,
    },
}

/// An immutable, ordered view of the event collection.
///
/// Cloning is an `Arc` bump. Equality compares events by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    events: Arc<[Arc<Event>]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            events: Arc::from(Vec::new()),
        }
    }
}

impl Snapshot {
    fn from_vec(events: Vec<Arc<Event>>) -> Self {
        Self {
            events: Arc::from(events),
        }
    }

    /// Events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|e| &**e)
    }

    /// Shared handles to the events, in insertion order.
    pub fn handles(&self) -> &[Arc<Event>] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the snapshot has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Finds an event by id.
    pub fn get(&self, id: &EventId) -> Option<&Arc<Event>> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Whether an event with this id exists.
    pub fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    /// Events assigned to a resource, in insertion order.
    pub fn events_for_resource<'a>(
        &'a self,
        resource_id: &'a ResourceId,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.iter().filter(move |e| &e.resource_id == resource_id)
    }

    /// Render keys of every event, in insertion order.
    pub fn render_keys(&self) -> Vec<RenderKey> {
        self.iter().map(Event::render_key).collect()
    }

    /// Whether some event is rendered under `key`.
    pub fn contains_key(&self, key: &RenderKey) -> bool {
        self.iter()
            .any(|e| e.id == key.event_id && e.resource_id == key.resource_id)
    }
}

/// Owner of the current event snapshot.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    current: Snapshot,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `events` in order, rejecting duplicate ids.
    ///
    /// Only id uniqueness is checked here; run
    /// [`validate_seed`](crate::validation::validate_seed) for the rest.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Result<Self, StoreError> {
        let mut handles: Vec<Arc<Event>> = Vec::new();
        for event in events {
            if handles.iter().any(|e| e.id == event.id) {
                return Err(StoreError::DuplicateId(event.id));
            }
            handles.push(Arc::new(event));
        }
        Ok(Self {
            current: Snapshot::from_vec(handles),
        })
    }

    /// The current snapshot.
    pub fn list(&self) -> Snapshot {
        self.current.clone()
    }

    /// Finds an event in the current snapshot.
    pub fn get(&self, id: &EventId) -> Option<Arc<Event>> {
        self.current.get(id).cloned()
    }

    /// Builds a snapshot where the event `id` is replaced by `updater(event)`.
    ///
    /// Every other event is shared with the current snapshot. The current
    /// snapshot is not modified.
    pub fn replace<F>(&self, id: &EventId, updater: F) -> Result<Snapshot, StoreError>
    where
        F: FnOnce(&Event) -> Event,
    {
        let position = self
            .current
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut events = self.current.events.to_vec();
        let updated = updater(&*events[position]);
        if &updated.id != id {
            return Err(StoreError::IdChanged {
                from: id.clone(),
                to: updated.id,
            });
        }
        events[position] = Arc::new(updated);
        Ok(Snapshot::from_vec(events))
    }

    /// Builds a snapshot with `event` appended.
    pub fn insert(&self, event: Event) -> Result<Snapshot, StoreError> {
        if self.current.contains(&event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        let mut events = Vec::with_capacity(self.current.len() + 1);
        events.extend(self.current.events.iter().cloned());
        events.push(Arc::new(event));
        Ok(Snapshot::from_vec(events))
    }

    /// Makes `snapshot` the current one.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.current = snapshot;
    }
}
