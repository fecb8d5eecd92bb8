//! Node persistence trait
//!
//! Defines the read/write contract for the node table: point read by name,
//! full-row upsert, and a fleet-wide list read. The upsert is atomic per
//! row and last write wins; the list read is a point-in-time snapshot with
//! no cross-row guarantee.

use async_trait::async_trait;

use crate::model::NodeRecord;

/// Node storage operations
#[async_trait]
pub trait NodePersistence: Send + Sync {
    /// Find a node row by its unique name
    async fn node_find_by_name(&self, name: &str) -> anyhow::Result<Option<NodeRecord>>;

    /// Insert or fully replace a node row keyed by name
    async fn node_upsert(&self, record: &NodeRecord) -> anyhow::Result<()>;

    /// Read every persisted node row; order is unspecified
    async fn node_find_all(&self) -> anyhow::Result<Vec<NodeRecord>>;
}
