//! Veita registry server
//!
//! HTTP surface over the fleet service: node registration, credential
//! management, authenticated telemetry ingestion, and fleet queries.

pub mod api;
pub mod model;
pub mod startup;
