//! Server-side models: configuration, request forms, response envelope

pub mod config;
pub mod response;

use serde::{Deserialize, Serialize};

use veita_fleet::FleetService;

/// Shared application state handed to every handler
pub struct AppState {
    pub configuration: config::Configuration,
    pub fleet: FleetService,
}

/// Body of a node registration request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub ip: String,
}

/// Body of a key revocation request
///
/// The key travels in the body rather than the path so it never lands in
/// access logs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeForm {
    pub key: String,
}

/// Query parameters for best-n selection
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BestQuery {
    pub count: Option<usize>,
}

/// Response body for an issued API key
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedKey {
    pub node: String,
    pub key: String,
}
