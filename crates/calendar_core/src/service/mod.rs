//! Core use-case services.
//!
//! # Responsibility
//! - Bridge in-memory calendar state and the durable local store.
//! - Keep view code decoupled from storage details.

pub mod calendar_app;
pub mod event_store;
pub mod persistence;
