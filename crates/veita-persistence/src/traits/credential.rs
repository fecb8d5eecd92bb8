//! Credential persistence trait
//!
//! Storage for node API keys. Key validation policy (status and node-name
//! matching) lives in the fleet core; this trait only stores and looks up
//! rows.

use async_trait::async_trait;

use crate::model::ApiKeyInfo;

/// API key storage operations
#[async_trait]
pub trait CredentialPersistence: Send + Sync {
    /// Find an API key row by the key string
    async fn api_key_find(&self, key: &str) -> anyhow::Result<Option<ApiKeyInfo>>;

    /// Insert or replace an API key row
    async fn api_key_save(&self, info: &ApiKeyInfo) -> anyhow::Result<()>;
}
