//! Event id generation.

use uuid::Uuid;

use crate::models::EventId;

/// Source of fresh event ids for created events.
///
/// Implementations need not guarantee uniqueness: the dispatcher checks
/// each id against the store and asks again on collision.
pub trait IdGenerator {
    /// Returns a candidate id.
    fn generate_id(&mut self) -> EventId;
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&mut self) -> EventId {
        EventId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `{prefix}{n}` ids, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequenceIdGenerator {
    prefix: String,
    next: u64,
}

impl SequenceIdGenerator {
    /// Creates a generator producing `{prefix}1`, `{prefix}2`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Sets the next number to emit.
    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = next;
        self
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate_id(&mut self) -> EventId {
        let id = EventId::new(format!("{}{}", self.prefix, self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}
