//! Veita Persistence - Storage contract and backends
//!
//! This crate provides:
//! - SeaORM entity definitions for the fleet tables
//! - Persistence trait abstractions for unified storage
//! - Row model types exchanged with the storage layer
//!
//! The fleet core requires only atomic single-row upserts and point/list
//! reads; no joins and no multi-row transactions. Concurrent writers are
//! resolved by last-write-wins full-row replacement.

pub mod entity;
pub mod memory;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export persistence traits
pub use traits::{CredentialPersistence, NodePersistence};

// Re-export backends
pub use memory::InMemoryPersistService;
pub use sql::ExternalDbPersistService;

// Re-export row models
pub use model::{ApiKeyInfo, KEY_STATUS_GOOD, KEY_STATUS_REVOKED, NodeRecord, StorageMode};
