//! In-memory event store with write-through persistence.
//!
//! # Responsibility
//! - Own the event collection and be its only mutator.
//! - Provide create/update/delete and the per-date query used by views.
//! - Re-persist the full collection after every effective mutation.
//!
//! # Invariants
//! - Event ids are unique within the collection.
//! - Every stored event passes `Event::validate()`.
//! - `query_by_date` output is sorted by `time` ascending; ties keep
//!   insertion order.

use crate::date::{date_key, days_in_month};
use crate::id::{IdGenerator, UuidIdGenerator};
use crate::model::event::{Event, EventDraft, EventId, EventValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::persistence::PersistenceAdapter;
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 16;

pub type StoreResult<T> = Result<T, StoreError>;

/// Event store error surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input failed field validation; nothing was stored.
    Validation(EventValidationError),
    /// No event with this id exists.
    NotFound(EventId),
    /// A create was requested without a target date.
    NoDateSelected,
    /// The id generator kept returning ids already in use.
    IdCollision(EventId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::NoDateSelected => write!(f, "no date selected"),
            Self::IdCollision(id) => write!(f, "generated event id already in use: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for StoreError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Owner of the calendar's event collection.
pub struct EventStore<S: KeyValueStore, G: IdGenerator = UuidIdGenerator> {
    events: Vec<Event>,
    ids: G,
    persistence: PersistenceAdapter<S>,
}

impl<S: KeyValueStore> EventStore<S, UuidIdGenerator> {
    /// Loads the persisted collection using random UUID ids for new events.
    pub fn load(persistence: PersistenceAdapter<S>) -> Self {
        Self::load_with_ids(persistence, UuidIdGenerator)
    }
}

impl<S: KeyValueStore, G: IdGenerator> EventStore<S, G> {
    /// Loads the persisted collection and uses `ids` for new events.
    pub fn load_with_ids(persistence: PersistenceAdapter<S>, ids: G) -> Self {
        let events = persistence.load_events();
        info!(
            "event=store_load module=store status=ok count={}",
            events.len()
        );
        Self {
            events,
            ids,
            persistence,
        }
    }

    /// Creates an event on `date` from an editor draft.
    ///
    /// # Errors
    /// - `Validation` when the trimmed title is empty, `date` is not a
    ///   canonical key, or the time is not canonical `HH:MM`.
    pub fn create(&mut self, date: &str, draft: &EventDraft) -> StoreResult<Event> {
        if let Err(err) = draft.validate_on(date) {
            warn!(
                "event=event_create module=store status=rejected reason={}",
                validation_code(&err)
            );
            return Err(err.into());
        }

        let id = self.fresh_id()?;
        let event = Event::from_draft(id, date, draft);
        self.events.push(event.clone());
        let persisted = self.persist();
        info!(
            "event=event_create module=store status=ok event_id={} date={} persisted={}",
            event.id, event.date, persisted
        );
        Ok(event)
    }

    /// Replaces title, description and time of the event with `id`.
    ///
    /// The id and date are kept.
    ///
    /// # Errors
    /// - `NotFound` when no event has this id.
    /// - `Validation` when the draft is invalid; the stored event is unchanged.
    pub fn update(&mut self, id: &EventId, draft: &EventDraft) -> StoreResult<Event> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut updated = self.events[index].clone();
        updated.apply_draft(draft);
        if let Err(err) = updated.validate() {
            warn!(
                "event=event_update module=store status=rejected event_id={} reason={}",
                id,
                validation_code(&err)
            );
            return Err(err.into());
        }

        self.events[index] = updated.clone();
        let persisted = self.persist();
        info!(
            "event=event_update module=store status=ok event_id={} persisted={}",
            id, persisted
        );
        Ok(updated)
    }

    /// Removes the event with `id`.
    ///
    /// Returns the removed event; deleting an unknown id is a no-op that
    /// returns `None` and does not touch storage.
    pub fn delete(&mut self, id: &EventId) -> Option<Event> {
        let index = self.position(id)?;
        let removed = self.events.remove(index);
        let persisted = self.persist();
        info!(
            "event=event_delete module=store status=ok event_id={} persisted={}",
            id, persisted
        );
        Some(removed)
    }

    /// Returns events on `date` ordered by time.
    ///
    /// Unknown or non-canonical dates simply match nothing.
    pub fn query_by_date(&self, date: &str) -> Vec<&Event> {
        let mut matches: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| event.date == date)
            .collect();
        matches.sort_by(|a, b| a.time.cmp(&b.time));
        matches
    }

    /// Days (1-based) of a zero-based month that have at least one event.
    pub fn days_with_events(&self, year: i32, month: u32) -> BTreeSet<u32> {
        let Some(day_count) = days_in_month(year, month) else {
            return BTreeSet::new();
        };
        (1..=day_count)
            .filter(|day| {
                date_key(year, month, *day)
                    .is_some_and(|key| self.events.iter().any(|event| event.date == key))
            })
            .collect()
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    /// All events in storage order.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|event| &event.id == id)
    }

    fn fresh_id(&mut self) -> StoreResult<EventId> {
        let mut candidate = self.ids.next_id();
        let mut attempts = 1;
        while self.position(&candidate).is_some() {
            if attempts == MAX_ID_ATTEMPTS {
                warn!(
                    "event=event_create module=store status=error error_code=id_collision attempts={}",
                    attempts
                );
                return Err(StoreError::IdCollision(candidate));
            }
            candidate = self.ids.next_id();
            attempts += 1;
        }
        Ok(candidate)
    }

    fn persist(&self) -> bool {
        self.persistence.save_events(&self.events)
    }
}

fn validation_code(err: &EventValidationError) -> &'static str {
    match err {
        EventValidationError::EmptyTitle => "empty_title",
        EventValidationError::InvalidDate(_) => "invalid_date",
        EventValidationError::InvalidTime(_) => "invalid_time",
        EventValidationError::EmptyId => "empty_id",
    }
}
