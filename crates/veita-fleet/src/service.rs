//! Fleet service layer
//!
//! Registration, authenticated telemetry ingestion, credential management,
//! and fleet queries. Every operation is a short-lived transaction against
//! the shared store: nothing is cached between calls, and a full-row save
//! resolves concurrent reporters by last write wins.

use std::sync::Arc;

use rand::RngCore;
use tracing::{info, warn};

use veita_common::{VeitaError, now_secs};
use veita_persistence::{
    ApiKeyInfo, CredentialPersistence, KEY_STATUS_GOOD, KEY_STATUS_REVOKED, NodePersistence,
};

use crate::fleet::Fleet;
use crate::model::{Node, TelemetryReport};

/// Bytes of entropy per issued API key (hex-encoded to 64 chars)
const API_KEY_BYTES: usize = 32;

/// Fleet operations over the persistence traits
#[derive(Clone)]
pub struct FleetService {
    nodes: Arc<dyn NodePersistence>,
    credentials: Arc<dyn CredentialPersistence>,
}

impl FleetService {
    pub fn new(
        nodes: Arc<dyn NodePersistence>,
        credentials: Arc<dyn CredentialPersistence>,
    ) -> Self {
        Self { nodes, credentials }
    }

    /// Register a new node and persist it immediately
    ///
    /// Fails when the name is already taken or the address does not parse.
    pub async fn register(&self, name: &str, ip: &str) -> Result<Node, VeitaError> {
        if self.nodes.node_find_by_name(name).await?.is_some() {
            return Err(VeitaError::NodeAlreadyExists(name.to_string()));
        }

        let ip = ip
            .parse()
            .map_err(|_| VeitaError::InvalidAddress(ip.to_string()))?;

        let node = Node::new(name, ip);
        self.save(&node).await?;
        info!(node = name, %ip, "Registered node");

        Ok(node)
    }

    /// Load one node, recomputing derived values
    pub async fn load(&self, name: &str) -> Result<Node, VeitaError> {
        let record = self
            .nodes
            .node_find_by_name(name)
            .await?
            .ok_or_else(|| VeitaError::NodeNotFound(name.to_string()))?;

        Node::from_record(&record)
    }

    /// Full-row upsert keyed by name; idempotent, last write wins
    pub async fn save(&self, node: &Node) -> Result<(), VeitaError> {
        self.nodes.node_upsert(&node.to_record()).await?;
        Ok(())
    }

    /// Check a presented key against a node identity
    pub async fn validate_key(&self, name: &str, key: &str) -> Result<bool, VeitaError> {
        let found = self.credentials.api_key_find(key).await?;
        Ok(found.is_some_and(|k| k.good() && k.node_name == name))
    }

    /// Authenticate a node by API key, then load it
    ///
    /// A valid key for a nonexistent node still fails; the HTTP layer maps
    /// both outcomes to the same status so callers cannot probe which names
    /// exist.
    pub async fn authenticate(&self, name: &str, key: &str) -> Result<Node, VeitaError> {
        if !self.validate_key(name, key).await? {
            warn!(node = name, "Rejected API key");
            return Err(VeitaError::AuthenticationFailed(name.to_string()));
        }
        self.load(name).await
    }

    /// Issue a fresh API key for an existing node
    pub async fn issue_key(&self, name: &str) -> Result<String, VeitaError> {
        // Key for a nonexistent node would be unusable; refuse up front
        self.load(name).await?;

        let mut buf = [0u8; API_KEY_BYTES];
        rand::rng().fill_bytes(&mut buf);
        let key = const_hex::encode(buf);

        self.credentials
            .api_key_save(&ApiKeyInfo {
                key: key.clone(),
                node_name: name.to_string(),
                status: KEY_STATUS_GOOD.to_string(),
            })
            .await?;
        info!(node = name, "Issued API key");

        Ok(key)
    }

    /// Revoke an API key; unknown keys are a no-op
    pub async fn revoke_key(&self, key: &str) -> Result<(), VeitaError> {
        if let Some(mut info) = self.credentials.api_key_find(key).await? {
            info.status = KEY_STATUS_REVOKED.to_string();
            self.credentials.api_key_save(&info).await?;
            info!(node = %info.node_name, "Revoked API key");
        }
        Ok(())
    }

    /// Apply one authenticated telemetry report
    ///
    /// Validation happens on an in-memory copy before the row is written, so
    /// a rejected report leaves the persisted state untouched. The heartbeat
    /// is stamped from the server clock, never from the reporter.
    pub async fn report(
        &self,
        name: &str,
        key: &str,
        report: &TelemetryReport,
    ) -> Result<Node, VeitaError> {
        let mut node = self.authenticate(name, key).await?;

        node.set_usercount(report.usercount)?;
        node.set_uptime(&report.uptime)?;
        node.set_cpu(report.cpu);
        node.set_throughput(report.throughput);
        node.set_total_throughput(report.total_throughput);
        node.set_selfcheck(report.selfcheck);
        node.set_heartbeat(now_secs());

        self.save(&node).await?;

        Ok(node)
    }

    /// Snapshot of every persisted node
    pub async fn fleet(&self) -> Result<Fleet, VeitaError> {
        let records = self.nodes.node_find_all().await?;

        let mut nodes = Vec::with_capacity(records.len());
        for record in &records {
            nodes.push(Node::from_record(record)?);
        }

        Ok(Fleet::new(nodes))
    }

    /// Best-n selection over the current fleet
    pub async fn best(&self, n: usize) -> Result<Vec<Node>, VeitaError> {
        Ok(self.fleet().await?.best(n))
    }
}
