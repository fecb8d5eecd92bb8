//! Node record: validated telemetry and derived health
//!
//! A node row is identified by its immutable name. Telemetry fields are
//! mutated through validating setters that return typed errors instead of
//! panicking. Score, heartbeat age, and liveness are always derived from the
//! current field values; a stored score is never trusted for decisions.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use veita_common::{
    CPU_SATURATION_PCT, DEFAULT_UPTIME, HEARTBEAT_TTL_SECS, SATURATED_SCORE, VeitaError,
    is_valid_uptime, now_unix,
};
use veita_persistence::NodeRecord;

use crate::wire::{NodeView, SCHEMA_VERSION};

/// A single service-delivery node
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: String,
    ip: IpAddr,
    usercount: i64,
    cpu: f64,
    throughput: i64,
    total_throughput: i64,
    uptime: String,
    selfcheck: bool,
    heartbeat: i64,
}

impl Node {
    /// Create a node with default telemetry
    ///
    /// A fresh node has no heartbeat and selfcheck off, so it is down until
    /// its first report.
    pub fn new(name: &str, ip: IpAddr) -> Self {
        Self {
            name: name.to_string(),
            ip,
            usercount: 0,
            cpu: 0.0,
            throughput: 0,
            total_throughput: 0,
            uptime: DEFAULT_UPTIME.to_string(),
            selfcheck: false,
            heartbeat: 0,
        }
    }

    /// Rehydrate a node from its stored row
    ///
    /// The stored score column is ignored; derived values are recomputed on
    /// every read.
    pub fn from_record(record: &NodeRecord) -> Result<Self, VeitaError> {
        let ip: IpAddr = record
            .ip
            .parse()
            .map_err(|_| VeitaError::InvalidAddress(record.ip.clone()))?;

        Ok(Self {
            name: record.name.clone(),
            ip,
            usercount: record.usercount,
            cpu: record.cpu,
            throughput: record.throughput,
            total_throughput: record.total_throughput,
            uptime: record.uptime.clone(),
            selfcheck: record.selfcheck,
            heartbeat: record.heartbeat,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn usercount(&self) -> i64 {
        self.usercount
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn throughput(&self) -> i64 {
        self.throughput
    }

    pub fn total_throughput(&self) -> i64 {
        self.total_throughput
    }

    pub fn uptime(&self) -> &str {
        &self.uptime
    }

    pub fn selfcheck(&self) -> bool {
        self.selfcheck
    }

    pub fn heartbeat(&self) -> i64 {
        self.heartbeat
    }

    /// Set the connected-client count; rejects negative values
    pub fn set_usercount(&mut self, value: i64) -> Result<(), VeitaError> {
        if value < 0 {
            return Err(VeitaError::InvalidUsercount(value));
        }
        self.usercount = value;
        Ok(())
    }

    /// Set the uptime string; must match the `<digits>d <digits>h` pattern
    pub fn set_uptime(&mut self, value: &str) -> Result<(), VeitaError> {
        if !is_valid_uptime(value) {
            return Err(VeitaError::InvalidUptimeFormat(value.to_string()));
        }
        self.uptime = value.trim().to_string();
        Ok(())
    }

    /// Stamp the heartbeat from a fractional clock reading, storing the floor
    pub fn set_heartbeat(&mut self, secs: f64) {
        self.heartbeat = secs.floor() as i64;
    }

    pub fn set_cpu(&mut self, value: f64) {
        self.cpu = value;
    }

    pub fn set_selfcheck(&mut self, value: bool) {
        self.selfcheck = value;
    }

    pub fn set_throughput(&mut self, value: i64) {
        self.throughput = value;
    }

    pub fn set_total_throughput(&mut self, value: i64) {
        self.total_throughput = value;
    }

    /// Synthetic load ranking; lower is more preferred
    ///
    /// Saturated nodes (cpu at or above the threshold) get a fixed penalty
    /// score regardless of usercount.
    pub fn score(&self) -> i64 {
        if self.cpu < CPU_SATURATION_PCT {
            self.usercount + (self.cpu / 10.0).floor() as i64
        } else {
            SATURATED_SCORE
        }
    }

    /// Seconds since the last telemetry report, relative to `now`
    pub fn heartbeat_age(&self, now: i64) -> i64 {
        now - self.heartbeat
    }

    /// Liveness at the given instant
    ///
    /// `selfcheck == false` always means down, regardless of heartbeat
    /// recency; that is how an operator pulls a node out of rotation without
    /// deleting it.
    pub fn alive_at(&self, now: i64) -> bool {
        self.selfcheck && self.heartbeat_age(now) <= HEARTBEAT_TTL_SECS
    }

    /// Liveness against the current clock
    pub fn alive(&self) -> bool {
        self.alive_at(now_unix())
    }

    /// Full row for persistence; the derived score is stored for operator
    /// visibility only
    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            name: self.name.clone(),
            ip: self.ip.to_string(),
            usercount: self.usercount,
            heartbeat: self.heartbeat,
            score: self.score(),
            selfcheck: self.selfcheck,
            throughput: self.throughput,
            cpu: self.cpu,
            uptime: self.uptime.clone(),
            total_throughput: self.total_throughput,
        }
    }

    /// Wire view with derived fields evaluated at `now`
    pub fn to_view(&self, now: i64) -> NodeView {
        NodeView {
            schema_version: SCHEMA_VERSION,
            name: self.name.clone(),
            ip: self.ip.to_string(),
            score: self.score(),
            usercount: self.usercount,
            heartbeat: self.heartbeat,
            selfcheck: self.selfcheck,
            heartbeat_age: self.heartbeat_age(now),
            alive: self.alive_at(now),
            throughput: self.throughput,
            total_throughput: self.total_throughput,
            uptime: self.uptime.clone(),
            cpu: self.cpu,
        }
    }
}

/// One full telemetry report as pushed by a node
///
/// Heartbeat is deliberately absent: the server stamps it from its own clock
/// at write time so a skewed reporter cannot spoof liveness.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelemetryReport {
    pub usercount: i64,
    pub cpu: f64,
    pub uptime: String,
    pub throughput: i64,
    pub total_throughput: i64,
    pub selfcheck: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new("vpn1", "10.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_new_node_defaults() {
        let n = node();
        assert_eq!(n.name(), "vpn1");
        assert_eq!(n.ip().to_string(), "10.0.0.1");
        assert_eq!(n.usercount(), 0);
        assert_eq!(n.cpu(), 0.0);
        assert_eq!(n.heartbeat(), 0);
        assert_eq!(n.uptime(), "0d 0h");
        assert!(!n.selfcheck());
    }

    #[test]
    fn test_score_below_saturation() {
        let mut n = node();
        n.set_usercount(5).unwrap();
        n.set_cpu(50.0);
        assert_eq!(n.score(), 5 + 5);

        n.set_cpu(49.9);
        assert_eq!(n.score(), 5 + 4);

        n.set_cpu(0.0);
        assert_eq!(n.score(), 5);
    }

    #[test]
    fn test_score_saturated_ignores_usercount() {
        let mut n = node();
        n.set_usercount(5).unwrap();
        n.set_cpu(80.0);
        assert_eq!(n.score(), 100);

        n.set_usercount(0).unwrap();
        assert_eq!(n.score(), 100);

        // Threshold is inclusive
        n.set_cpu(75.0);
        assert_eq!(n.score(), 100);

        n.set_cpu(74.9);
        assert_eq!(n.score(), 0 + 7);
    }

    #[test]
    fn test_usercount_rejects_negative() {
        let mut n = node();
        assert!(matches!(
            n.set_usercount(-1),
            Err(VeitaError::InvalidUsercount(-1))
        ));
        assert_eq!(n.usercount(), 0);
    }

    #[test]
    fn test_uptime_validation() {
        let mut n = node();
        n.set_uptime("3d 4h").unwrap();
        assert_eq!(n.uptime(), "3d 4h");

        assert!(matches!(
            n.set_uptime("3 days"),
            Err(VeitaError::InvalidUptimeFormat(_))
        ));
        assert_eq!(n.uptime(), "3d 4h");
    }

    #[test]
    fn test_heartbeat_floors_fractional_clock() {
        let mut n = node();
        n.set_heartbeat(1724_000_123.987);
        assert_eq!(n.heartbeat(), 1724_000_123);
    }

    #[test]
    fn test_alive_requires_selfcheck() {
        let now = 10_000;
        let mut n = node();
        n.set_heartbeat(now as f64);
        assert!(!n.alive_at(now));

        n.set_selfcheck(true);
        assert!(n.alive_at(now));
    }

    #[test]
    fn test_alive_heartbeat_window() {
        let now = 10_000;
        let mut n = node();
        n.set_selfcheck(true);

        n.set_heartbeat((now - 720) as f64);
        assert!(n.alive_at(now));

        n.set_heartbeat((now - 721) as f64);
        assert!(!n.alive_at(now));

        // Stale heartbeat plus selfcheck off is still down
        n.set_selfcheck(false);
        assert!(!n.alive_at(now));
    }

    #[test]
    fn test_record_round_trip_ignores_stored_score() {
        let mut n = node();
        n.set_usercount(5).unwrap();
        n.set_cpu(50.0);

        let mut record = n.to_record();
        assert_eq!(record.score, 10);

        // A tampered stored score must not survive a load
        record.score = 1;
        let loaded = Node::from_record(&record).unwrap();
        assert_eq!(loaded.score(), 10);
        assert_eq!(loaded, n);
    }

    #[test]
    fn test_from_record_rejects_malformed_address() {
        let record = NodeRecord {
            name: "bad".to_string(),
            ip: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Node::from_record(&record),
            Err(VeitaError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_ipv6_address() {
        let n = Node::new("vpn6", "2001:db8::1".parse().unwrap());
        assert_eq!(n.to_record().ip, "2001:db8::1");
    }

    #[test]
    fn test_view_derived_fields() {
        let now = 10_000;
        let mut n = node();
        n.set_usercount(2).unwrap();
        n.set_cpu(30.0);
        n.set_selfcheck(true);
        n.set_heartbeat((now - 60) as f64);

        let view = n.to_view(now);
        assert_eq!(view.schema_version, SCHEMA_VERSION);
        assert_eq!(view.score, 5);
        assert_eq!(view.heartbeat_age, 60);
        assert!(view.alive);
    }
}
