//! SQL-based persistence backend (MySQL/PostgreSQL via SeaORM)
//!
//! Implements the node and credential persistence traits over an external
//! relational database. The node upsert is a single-statement
//! insert-on-conflict so concurrent reporters resolve by last write wins
//! without any locking.

use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, *};
use tracing::debug;

use crate::entity::{api_keys, node_info};
use crate::model::{ApiKeyInfo, NodeRecord};
use crate::traits::{CredentialPersistence, NodePersistence};

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` and implements the persistence traits
/// with direct database queries.
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn record_from_model(m: node_info::Model) -> NodeRecord {
    NodeRecord {
        name: m.name,
        ip: m.ip,
        usercount: m.usercount,
        heartbeat: m.heartbeat,
        score: m.score,
        selfcheck: m.selfcheck,
        throughput: m.throughput,
        cpu: m.cpu,
        uptime: m.uptime,
        total_throughput: m.total_throughput,
    }
}

#[async_trait]
impl NodePersistence for ExternalDbPersistService {
    async fn node_find_by_name(&self, name: &str) -> anyhow::Result<Option<NodeRecord>> {
        let row = node_info::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await?;

        Ok(row.map(record_from_model))
    }

    async fn node_upsert(&self, record: &NodeRecord) -> anyhow::Result<()> {
        let active = node_info::ActiveModel {
            name: Set(record.name.clone()),
            ip: Set(record.ip.clone()),
            usercount: Set(record.usercount),
            heartbeat: Set(record.heartbeat),
            score: Set(record.score),
            selfcheck: Set(record.selfcheck),
            throughput: Set(record.throughput),
            cpu: Set(record.cpu),
            uptime: Set(record.uptime.clone()),
            total_throughput: Set(record.total_throughput),
        };

        node_info::Entity::insert(active)
            .on_conflict(
                OnConflict::column(node_info::Column::Name)
                    .update_columns([
                        node_info::Column::Ip,
                        node_info::Column::Usercount,
                        node_info::Column::Heartbeat,
                        node_info::Column::Score,
                        node_info::Column::Selfcheck,
                        node_info::Column::Throughput,
                        node_info::Column::Cpu,
                        node_info::Column::Uptime,
                        node_info::Column::TotalThroughput,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        debug!(node = %record.name, "Upserted node row");

        Ok(())
    }

    async fn node_find_all(&self) -> anyhow::Result<Vec<NodeRecord>> {
        let rows = node_info::Entity::find().all(&self.db).await?;

        Ok(rows.into_iter().map(record_from_model).collect())
    }
}

#[async_trait]
impl CredentialPersistence for ExternalDbPersistService {
    async fn api_key_find(&self, key: &str) -> anyhow::Result<Option<ApiKeyInfo>> {
        let row = api_keys::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        Ok(row.map(|m| ApiKeyInfo {
            key: m.key,
            node_name: m.node_name,
            status: m.status,
        }))
    }

    async fn api_key_save(&self, info: &ApiKeyInfo) -> anyhow::Result<()> {
        let active = api_keys::ActiveModel {
            key: Set(info.key.clone()),
            node_name: Set(info.node_name.clone()),
            status: Set(info.status.clone()),
        };

        api_keys::Entity::insert(active)
            .on_conflict(
                OnConflict::column(api_keys::Column::Key)
                    .update_columns([api_keys::Column::NodeName, api_keys::Column::Status])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        debug!(node = %info.node_name, status = %info.status, "Saved API key row");

        Ok(())
    }
}
