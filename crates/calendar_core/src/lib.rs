//! Core calendar logic: date geometry, event store and local persistence.
//! This crate is the single source of truth for event invariants.

pub mod config;
pub mod date;
pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CalendarConfig, ConfigError};
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status, LoggingError};
pub use model::event::{Event, EventDraft, EventId, EventValidationError};
pub use model::theme::Theme;
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use service::calendar_app::{CalendarApp, ViewMode, ViewState};
pub use service::event_store::{EventStore, StoreError, StoreResult};
pub use service::persistence::{PersistenceAdapter, EVENTS_KEY, THEME_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
