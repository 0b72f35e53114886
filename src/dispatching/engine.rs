//! Mutation dispatcher.
//!
//! Single writer over the event store. Each intent is handled to completion
//! before the next: build a candidate, validate it, commit or reject. A
//! rejected intent never changes the published snapshot.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{
    parse_instant, DispatchError, IdGenerator, Intent, SnapshotSink, UuidIdGenerator,
};
use crate::config::DispatcherConfig;
use crate::models::{Event, EventId, ResourceId};
use crate::registry::ResourceRegistry;
use crate::store::{EventStore, Snapshot};
use crate::validation::Validator;

/// Applies drop, resize, and select intents to an event store.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use u_timeline::dispatching::{MutationDispatcher, SequenceIdGenerator};
/// use u_timeline::models::Resource;
/// use u_timeline::registry::ResourceRegistry;
/// use u_timeline::store::EventStore;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let registry = ResourceRegistry::new(vec![Resource::new("A")]).unwrap();
/// let mut dispatcher = MutationDispatcher::new(registry, EventStore::new())
///     .with_id_generator(SequenceIdGenerator::new("evt-"));
///
/// let snapshot = dispatcher
///     .handle_create("A".into(), t0, t0 + Duration::hours(1), "Standup")
///     .unwrap();
/// assert_eq!(snapshot.len(), 1);
/// ```
pub struct MutationDispatcher<G: IdGenerator = UuidIdGenerator> {
    registry: ResourceRegistry,
    store: EventStore,
    ids: G,
    config: DispatcherConfig,
    sinks: Vec<Box<dyn SnapshotSink>>,
}

impl MutationDispatcher<UuidIdGenerator> {
    /// Creates a dispatcher with UUID ids and default configuration.
    ///
    /// The store is taken as-is; check seed data with
    /// [`validate_seed`](crate::validation::validate_seed) first.
    pub fn new(registry: ResourceRegistry, store: EventStore) -> Self {
        Self {
            registry,
            store,
            ids: UuidIdGenerator,
            config: DispatcherConfig::default(),
            sinks: Vec::new(),
        }
    }
}

impl<G: IdGenerator> MutationDispatcher<G> {
    /// Replaces the id generator.
    pub fn with_id_generator<H: IdGenerator>(self, ids: H) -> MutationDispatcher<H> {
        MutationDispatcher {
            registry: self.registry,
            store: self.store,
            ids,
            config: self.config,
            sinks: self.sinks,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a snapshot receiver.
    pub fn subscribe<S: SnapshotSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    /// The current snapshot.
    pub fn list(&self) -> Snapshot {
        self.store.list()
    }

    /// The resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Routes an intent to its handler.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Snapshot, DispatchError> {
        match intent {
            Intent::Drop {
                event_id,
                target_resource_id,
                new_start,
                new_end,
            } => self.handle_drop(&event_id, target_resource_id, new_start, new_end),
            Intent::Resize {
                event_id,
                new_start,
                new_end,
            } => self.handle_resize(&event_id, new_start, new_end),
            Intent::Select {
                resource_id,
                start_str,
                end_str,
            } => self.handle_select(resource_id, &start_str, &end_str),
        }
    }

    /// Moves an event to `new_resource_id` over `[new_start, new_end)`.
    pub fn handle_drop(
        &mut self,
        event_id: &EventId,
        new_resource_id: ResourceId,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Snapshot, DispatchError> {
        let result = self.update(event_id, |prior| {
            prior.moved_to(new_resource_id, new_start, new_end)
        });
        self.finish("drop", result)
    }

    /// Changes an event's range, keeping its lane.
    pub fn handle_resize(
        &mut self,
        event_id: &EventId,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Snapshot, DispatchError> {
        let result = self.update(event_id, |prior| prior.resized_to(new_start, new_end));
        self.finish("resize", result)
    }

    /// Creates an event on `resource_id` over `[start, end)` with a fresh id.
    ///
    /// `editable` and `resource_editable` come from the configuration.
    /// Colliding ids are regenerated, but only up to
    /// [`max_id_attempts`](DispatcherConfig::max_id_attempts) times: past
    /// that the create fails with [`DispatchError::IdSpaceExhausted`]
    /// instead of retrying forever.
    pub fn handle_create(
        &mut self,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Result<Snapshot, DispatchError> {
        let result = self.create(resource_id, start, end, title.into());
        self.finish("create", result)
    }

    fn handle_select(
        &mut self,
        resource_id: Option<ResourceId>,
        start_str: &str,
        end_str: &str,
    ) -> Result<Snapshot, DispatchError> {
        let parsed = resource_id
            .ok_or(DispatchError::NoResourceSelected)
            .and_then(|resource_id| {
                Ok((resource_id, parse_instant(start_str)?, parse_instant(end_str)?))
            });
        match parsed {
            Ok((resource_id, start, end)) => {
                let title = self.config.default_title.clone();
                self.handle_create(resource_id, start, end, title)
            }
            Err(err) => self.finish("select", Err(err)),
        }
    }

    fn update<F>(&mut self, event_id: &EventId, build: F) -> Result<Snapshot, DispatchError>
    where
        F: FnOnce(&Event) -> Event,
    {
        let current = self.store.list();
        let prior: &Event = current
            .get(event_id)
            .map(|e| e.as_ref())
            .ok_or_else(|| DispatchError::NotFound(event_id.clone()))?;

        let candidate = build(prior);
        if *prior == candidate {
            return Ok(current);
        }
        let accepted = self.validator(&current).validate(candidate, Some(prior))?;

        debug!(
            event_id = %accepted.id,
            from_resource = %prior.resource_id,
            to_resource = %accepted.resource_id,
            start = %accepted.start,
            end = %accepted.end,
            "event updated"
        );
        let next = self.store.replace(event_id, move |_| accepted)?;
        self.store.commit(next.clone());
        Ok(next)
    }

    fn create(
        &mut self,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: String,
    ) -> Result<Snapshot, DispatchError> {
        let current = self.store.list();
        let id = self.fresh_id(&current)?;

        let candidate = Event::new(id, resource_id, start, end)
            .with_title(title)
            .with_editable(self.config.default_editable)
            .with_resource_editable(self.config.default_resource_editable);
        let accepted = self.validator(&current).validate(candidate, None)?;

        debug!(
            event_id = %accepted.id,
            resource_id = %accepted.resource_id,
            start = %accepted.start,
            end = %accepted.end,
            "event created"
        );
        let next = self.store.insert(accepted)?;
        self.store.commit(next.clone());
        Ok(next)
    }

    fn fresh_id(&mut self, current: &Snapshot) -> Result<EventId, DispatchError> {
        for attempt in 1..=self.config.max_id_attempts {
            let id = self.ids.generate_id();
            if !current.contains(&id) {
                return Ok(id);
            }
            debug!(event_id = %id, attempt, "generated id already in use, regenerating");
        }
        Err(DispatchError::IdSpaceExhausted {
            attempts: self.config.max_id_attempts,
        })
    }

    fn validator<'a>(&'a self, current: &'a Snapshot) -> Validator<'a> {
        let validator = Validator::new(&self.registry);
        if self.config.allow_overlap {
            validator
        } else {
            validator.deny_overlap(current)
        }
    }

    fn finish(
        &mut self,
        intent: &'static str,
        result: Result<Snapshot, DispatchError>,
    ) -> Result<Snapshot, DispatchError> {
        if let Err(err) = &result {
            warn!(intent, error = %err, "intent rejected");
        }
        let snapshot = self.store.list();
        for sink in &mut self.sinks {
            sink.publish(&snapshot, result.as_ref().err());
        }
        result
    }
}
