//! Persistence trait abstractions
//!
//! Storage backends implement these traits; the fleet core depends only on
//! the traits so external-database and in-memory deployments share one code
//! path.

pub mod credential;
pub mod node;

pub use credential::CredentialPersistence;
pub use node::NodePersistence;
