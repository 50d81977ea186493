//! Persistence adapter between in-memory calendar state and the local store.
//!
//! # Responsibility
//! - Serialize the full event collection under `calendar-events`.
//! - Store the theme literal under `calendar-theme`.
//! - Absorb every storage failure: log it, never propagate it.
//!
//! # Invariants
//! - Reads never fail: missing or corrupt data degrades to "no data".
//! - One bad record never costs the valid records next to it.
//! - A failed write leaves the previously persisted value untouched.
//! - Logged records carry counts and keys only, never event text.

use crate::model::event::Event;
use crate::model::theme::Theme;
use crate::repo::kv_repo::KeyValueStore;
use log::{debug, error, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Storage key of the JSON event array.
pub const EVENTS_KEY: &str = "calendar-events";
/// Storage key of the theme literal.
pub const THEME_KEY: &str = "calendar-theme";

/// Best-effort bridge between calendar state and a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the persisted event collection.
    ///
    /// Returns an empty collection when the key is missing or the payload is
    /// not a JSON array. Records that are malformed, fail validation or repeat
    /// an earlier id are skipped. Every failure is logged.
    pub fn load_events(&self) -> Vec<Event> {
        let raw = match self.store.get(EVENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=events_load module=persistence status=ok source=empty count=0");
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=events_load module=persistence status=error error_code=read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
            Ok(records) => records.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event=events_load module=persistence status=error error_code=corrupt_payload bytes={} error={}",
                    raw.len(),
                    err
                );
                return Vec::new();
            }
        };

        let total = records.len();
        let events = keep_valid_records(records);
        if events.len() < total {
            warn!(
                "event=events_load module=persistence status=partial count={} skipped={}",
                events.len(),
                total - events.len()
            );
        } else {
            debug!(
                "event=events_load module=persistence status=ok source=store count={}",
                events.len()
            );
        }
        events
    }

    /// Overwrites the persisted collection with `events`.
    ///
    /// Returns whether the write reached the store. A failed write is logged
    /// and the in-memory state stays authoritative.
    pub fn save_events(&self, events: &[Event]) -> bool {
        let payload = match serde_json::to_string(events) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=events_save module=persistence status=error error_code=serialize_failed count={} error={}",
                    events.len(),
                    err
                );
                return false;
            }
        };

        match self.store.put(EVENTS_KEY, &payload) {
            Ok(()) => {
                debug!(
                    "event=events_save module=persistence status=ok count={} bytes={}",
                    events.len(),
                    payload.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=events_save module=persistence status=error error_code=write_failed count={} error={}",
                    events.len(),
                    err
                );
                false
            }
        }
    }

    /// Loads the persisted theme, `None` when absent or unreadable.
    pub fn load_theme(&self) -> Option<Theme> {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => match raw.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(err) => {
                    warn!(
                        "event=theme_load module=persistence status=error error_code=unknown_theme error={}",
                        err
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                error!(
                    "event=theme_load module=persistence status=error error_code=read_failed error={}",
                    err
                );
                None
            }
        }
    }

    /// Persists the theme literal. Same failure policy as [`Self::save_events`].
    pub fn save_theme(&self, theme: Theme) -> bool {
        match self.store.put(THEME_KEY, theme.as_str()) {
            Ok(()) => {
                debug!(
                    "event=theme_save module=persistence status=ok theme={}",
                    theme
                );
                true
            }
            Err(err) => {
                error!(
                    "event=theme_save module=persistence status=error error_code=write_failed theme={} error={}",
                    theme, err
                );
                false
            }
        }
    }
}

/// Keeps records that decode to a valid event; later duplicates of an id are
/// dropped.
fn keep_valid_records(records: Vec<Value>) -> Vec<Event> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let event = match serde_json::from_value::<Event>(record) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    "event=events_load module=persistence status=skipped record={} reason=malformed error={}",
                    index, err
                );
                continue;
            }
        };
        if let Err(err) = event.validate() {
            warn!(
                "event=events_load module=persistence status=skipped record={} reason=invalid error={}",
                index, err
            );
            continue;
        }
        if !seen.insert(event.id.clone()) {
            warn!(
                "event=events_load module=persistence status=skipped record={} reason=duplicate_id event_id={}",
                index, event.id
            );
            continue;
        }
        events.push(event);
    }
    events
}
