//! SeaORM entities for the fleet tables

pub mod api_keys;
pub mod node_info;

pub mod prelude {
    pub use super::api_keys::Entity as ApiKeys;
    pub use super::node_info::Entity as NodeInfo;
}
