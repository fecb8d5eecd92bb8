//! HTTP API handlers

pub mod fleet;

pub use fleet::routes;
