//! Veita Fleet - node health model and selection
//!
//! This crate is the core of the registry:
//! - `Node`: a single node's validated telemetry and derived liveness/score
//! - `Fleet`: point-in-time view of every node, partitioned into alive and
//!   down, with best-n selection for new traffic assignments
//! - `FleetService`: registration, authenticated telemetry reports, and
//!   fleet queries over the persistence traits

pub mod fleet;
pub mod model;
pub mod service;
pub mod wire;

pub use fleet::Fleet;
pub use model::{Node, TelemetryReport};
pub use service::FleetService;
pub use wire::{NodeView, SCHEMA_VERSION};
