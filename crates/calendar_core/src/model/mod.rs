//! Calendar domain model.
//!
//! # Responsibility
//! - Define the event record persisted under `calendar-events`.
//! - Define the theme preference persisted under `calendar-theme`.
//!
//! # Invariants
//! - Every event is identified by a stable, immutable `EventId`.
//! - Stored dates and times are always in canonical form.

pub mod event;
pub mod theme;
