//! Repository layer over the durable local key-value store.
//!
//! # Responsibility
//! - Define the key-value contract used by the persistence adapter.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes replace the full value stored under a key.
//! - Repository construction rejects connections without the expected schema.

pub mod kv_repo;
