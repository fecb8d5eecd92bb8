//! Wire mapping for node records
//!
//! `NodeView` is the explicit, versioned external representation of a node:
//! a fixed field list carrying both stored telemetry and the derived values
//! evaluated at a stated instant. Consumers should check `schemaVersion`
//! before relying on field semantics.

use serde::{Deserialize, Serialize};

/// Version of the node wire schema
pub const SCHEMA_VERSION: u32 = 1;

/// External representation of a node with derived fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub schema_version: u32,
    pub name: String,
    pub ip: String,
    pub score: i64,
    pub usercount: i64,
    pub heartbeat: i64,
    pub selfcheck: bool,
    pub heartbeat_age: i64,
    pub alive: bool,
    pub throughput: i64,
    pub total_throughput: i64,
    pub uptime: String,
    pub cpu: f64,
}
