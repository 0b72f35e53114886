//! Editing engine for resource-timeline calendars.
//!
//! Keeps a collection of timed events, each attached to one resource lane,
//! consistent while a user drags, resizes, and creates events. The calendar
//! widget stays outside: it sends finished gestures in as intents and gets
//! snapshots back.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Resource`, `Event`, ids, `RenderKey`
//! - **`registry`**: Immutable lane lookup
//! - **`store`**: Copy-on-write event snapshots
//! - **`validation`**: Candidate and seed checks
//! - **`dispatching`**: Intents, the mutation dispatcher, id generation
//! - **`config`**: Dispatcher defaults and policy
//! - **`seed`**: JSON loading of initial resources and events
//!
//! # Data flow
//!
//! gesture → [`Intent`](dispatching::Intent) →
//! [`MutationDispatcher`](dispatching::MutationDispatcher) →
//! [`Validator`](validation::Validator) → [`EventStore`](store::EventStore) →
//! [`Snapshot`](store::Snapshot) → [`SnapshotSink`](dispatching::SnapshotSink)

pub mod config;
pub mod dispatching;
pub mod models;
pub mod registry;
pub mod seed;
pub mod store;
pub mod validation;
