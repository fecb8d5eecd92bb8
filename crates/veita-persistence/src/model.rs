//! Row model types for persistence operations
//!
//! These are the shapes exchanged with the storage layer. Derived values
//! (score, liveness) are recomputed by the fleet core on every load; the
//! stored `score` column exists only so operators can inspect the last
//! computed ranking in the table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// API key status accepted by the credential check
pub const KEY_STATUS_GOOD: &str = "good";

/// API key status after revocation
pub const KEY_STATUS_REVOKED: &str = "revoked";

/// Full node row as stored, keyed by name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub name: String,
    pub ip: String,
    pub usercount: i64,
    pub heartbeat: i64,
    pub score: i64,
    pub selfcheck: bool,
    pub throughput: i64,
    pub cpu: f64,
    pub uptime: String,
    pub total_throughput: i64,
}

/// API key row for the credential check
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfo {
    pub key: String,
    pub node_name: String,
    pub status: String,
}

impl ApiKeyInfo {
    /// Whether this key is accepted by the credential check
    pub fn good(&self) -> bool {
        self.status == KEY_STATUS_GOOD
    }
}

/// Storage backend selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// External relational database via SeaORM
    #[default]
    External,
    /// In-process DashMap store (standalone mode and tests)
    Memory,
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "external" => Ok(StorageMode::External),
            "memory" => Ok(StorageMode::Memory),
            other => Err(format!("Unknown storage mode: {}", other)),
        }
    }
}
