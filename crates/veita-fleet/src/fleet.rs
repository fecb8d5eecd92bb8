//! Fleet aggregator: liveness partition and best-n selection
//!
//! A `Fleet` is a transient view over every persisted node, captured at a
//! single snapshot instant so that alive/down classification is consistent
//! across one query. It is never stored.

use rand::seq::SliceRandom;

use veita_common::{DEFAULT_BEST_COUNT, now_unix};

use crate::model::Node;
use crate::wire::NodeView;

/// Point-in-time view of the whole fleet
#[derive(Clone, Debug)]
pub struct Fleet {
    nodes: Vec<Node>,
    now: i64,
}

impl Fleet {
    /// Build a fleet snapshot against the current clock
    pub fn new(nodes: Vec<Node>) -> Self {
        Self::at(nodes, now_unix())
    }

    /// Build a fleet snapshot evaluated at a fixed instant
    pub fn at(nodes: Vec<Node>, now: i64) -> Self {
        Self { nodes, now }
    }

    /// Snapshot instant used for liveness classification
    pub fn snapshot_time(&self) -> i64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in the snapshot; order is unspecified
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes currently accepting traffic
    pub fn alive(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| node.alive_at(self.now))
            .collect()
    }

    /// Nodes out of rotation, whether faulted or manually disabled
    ///
    /// A node with `selfcheck == false` lands here even with a fresh
    /// heartbeat, so disabling removes it from the alive and best sets at
    /// the same time.
    pub fn down(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| !node.alive_at(self.now))
            .collect()
    }

    /// Up to `n` of the lowest-scored alive nodes, in random order
    ///
    /// The subset is chosen by ascending score, then shuffled so repeated
    /// calls spread load across the same top candidates instead of always
    /// favoring one ordering. The returned order does NOT reflect score.
    pub fn best(&self, n: usize) -> Vec<Node> {
        let mut ranked = self.alive();
        ranked.sort_by_key(|node| node.score());
        ranked.truncate(n);

        let mut picked: Vec<Node> = ranked.into_iter().cloned().collect();
        picked.shuffle(&mut rand::rng());
        picked
    }

    /// Best-n with the default selection width
    pub fn best_default(&self) -> Vec<Node> {
        self.best(DEFAULT_BEST_COUNT)
    }

    /// Wire views for every node, derived at the snapshot instant
    pub fn views(&self) -> Vec<NodeView> {
        self.nodes
            .iter()
            .map(|node| node.to_view(self.now))
            .collect()
    }
}
