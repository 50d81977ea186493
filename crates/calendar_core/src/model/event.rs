//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical calendar event record and its editor payload.
//! - Validate field-level invariants before an event enters the store.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `title` is non-empty after trimming.
//! - `date` is a canonical `YYYY-MM-DD` key, `time` a canonical `HH:MM`.
//! - Serialized shape is exactly `{id, title, description, time, date}`.

use crate::date::{is_canonical_date, is_canonical_time};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Time preset for a freshly opened editor.
pub const DEFAULT_EVENT_TIME: &str = "09:00";

/// Stable identifier of an event.
///
/// Serialized as a bare string to keep the stored JSON shape flat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Field-level validation failure for events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Date is not a canonical `YYYY-MM-DD` key of a real day.
    InvalidDate(String),
    /// Time is not a canonical `HH:MM` value.
    InvalidTime(String),
    /// Identifier is empty.
    EmptyId,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title cannot be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid event date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => write!(f, "invalid event time `{value}`; expected HH:MM"),
            Self::EmptyId => write!(f, "event id cannot be empty"),
        }
    }
}

impl Error for EventValidationError {}

/// Canonical calendar event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub description: String,
    /// 24-hour `HH:MM`.
    pub time: String,
    /// Canonical `YYYY-MM-DD`.
    pub date: String,
}

impl Event {
    /// Builds an event from a normalized draft.
    ///
    /// Callers are expected to run [`Event::validate`] before storing it.
    pub fn from_draft(id: EventId, date: impl Into<String>, draft: &EventDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            time: draft.time,
            date: date.into(),
        }
    }

    /// Replaces every mutable field except `date` with the draft's values.
    pub fn apply_draft(&mut self, draft: &EventDraft) {
        let draft = draft.normalized();
        self.title = draft.title;
        self.description = draft.description;
        self.time = draft.time;
    }

    /// Validates all field invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        validate_fields(&self.title, &self.date, &self.time)
    }
}

fn validate_fields(title: &str, date: &str, time: &str) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    if !is_canonical_date(date) {
        return Err(EventValidationError::InvalidDate(date.to_string()));
    }
    if !is_canonical_time(time) {
        return Err(EventValidationError::InvalidTime(time.to_string()));
    }
    Ok(())
}

/// Editor payload for creating or updating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub time: String,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            time: DEFAULT_EVENT_TIME.to_string(),
        }
    }
}

impl EventDraft {
    pub fn new(title: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            time: time.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pre-fills an editor from an existing event.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            time: event.time.clone(),
        }
    }

    /// Checks that this draft would produce a valid event on `date`.
    pub fn validate_on(&self, date: &str) -> Result<(), EventValidationError> {
        let normalized = self.normalized();
        validate_fields(&normalized.title, date, &normalized.time)
    }

    /// Returns a copy with title and description trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            time: self.time.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventDraft, EventId, EventValidationError, DEFAULT_EVENT_TIME};

    fn sample() -> Event {
        Event::from_draft(
            EventId::new("evt-1"),
            "2024-03-15",
            &EventDraft::new("  Standup ", "09:00").with_description("  daily  "),
        )
    }

    #[test]
    fn from_draft_trims_text_fields() {
        let event = sample();
        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, "daily");
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_each_broken_field() {
        let mut event = sample();
        event.title = "   ".to_string();
        assert_eq!(event.validate(), Err(EventValidationError::EmptyTitle));

        let mut event = sample();
        event.date = "2024-3-15".to_string();
        assert!(matches!(
            event.validate(),
            Err(EventValidationError::InvalidDate(_))
        ));

        let mut event = sample();
        event.time = "9am".to_string();
        assert!(matches!(
            event.validate(),
            Err(EventValidationError::InvalidTime(_))
        ));

        let mut event = sample();
        event.id = EventId::new("");
        assert_eq!(event.validate(), Err(EventValidationError::EmptyId));
    }

    #[test]
    fn apply_draft_keeps_identity_and_date() {
        let mut event = sample();
        event.apply_draft(&EventDraft::new("Retro", "16:00"));
        assert_eq!(event.id.as_str(), "evt-1");
        assert_eq!(event.date, "2024-03-15");
        assert_eq!(event.title, "Retro");
        assert_eq!(event.description, "");
    }

    #[test]
    fn serializes_with_flat_string_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "evt-1",
                "title": "Standup",
                "description": "daily",
                "time": "09:00",
                "date": "2024-03-15"
            })
        );
    }

    #[test]
    fn draft_validation_uses_trimmed_values() {
        let draft = EventDraft::new("  ", "09:00");
        assert_eq!(
            draft.validate_on("2024-03-15"),
            Err(EventValidationError::EmptyTitle)
        );
        assert!(EventDraft::new("ok", " 09:00 ")
            .validate_on("2024-03-15")
            .is_ok());
    }

    #[test]
    fn default_draft_starts_at_nine() {
        assert_eq!(EventDraft::default().time, DEFAULT_EVENT_TIME);
    }
}
