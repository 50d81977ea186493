//! Event identifier generation.
//!
//! # Invariants
//! - A generator never yields the same id twice within one process.
//! - Uniqueness against already stored ids is enforced by the event store.

use crate::model::event::EventId;
use uuid::Uuid;

/// Source of fresh event identifiers, injected into the event store.
pub trait IdGenerator {
    fn next_id(&mut self) -> EventId;
}

/// Random v4 UUID identifiers. Default for real sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> EventId {
        EventId::new(Uuid::new_v4().to_string())
    }
}

/// Monotonic counter identifiers such as `evt-1`, `evt-2`.
///
/// Deterministic, which makes it the generator of choice in tests.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("evt")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> EventId {
        let id = EventId::new(format!("{}-{}", self.prefix, self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> EventId {
        (**self).next_id()
    }
}
