//! In-memory persistence backend
//!
//! DashMap-backed storage for standalone deployments and tests. Rows are
//! replaced wholesale on upsert, matching the last-write-wins contract of
//! the SQL backend.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::{ApiKeyInfo, NodeRecord};
use crate::traits::{CredentialPersistence, NodePersistence};

/// Standalone in-memory persistence
#[derive(Default)]
pub struct InMemoryPersistService {
    nodes: DashMap<String, NodeRecord>,
    keys: DashMap<String, ApiKeyInfo>,
}

impl InMemoryPersistService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored node rows
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[async_trait]
impl NodePersistence for InMemoryPersistService {
    async fn node_find_by_name(&self, name: &str) -> anyhow::Result<Option<NodeRecord>> {
        Ok(self.nodes.get(name).map(|entry| entry.value().clone()))
    }

    async fn node_upsert(&self, record: &NodeRecord) -> anyhow::Result<()> {
        self.nodes.insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn node_find_all(&self) -> anyhow::Result<Vec<NodeRecord>> {
        Ok(self
            .nodes
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[async_trait]
impl CredentialPersistence for InMemoryPersistService {
    async fn api_key_find(&self, key: &str) -> anyhow::Result<Option<ApiKeyInfo>> {
        Ok(self.keys.get(key).map(|entry| entry.value().clone()))
    }

    async fn api_key_save(&self, info: &ApiKeyInfo) -> anyhow::Result<()> {
        self.keys.insert(info.key.clone(), info.clone());
        Ok(())
    }
}
