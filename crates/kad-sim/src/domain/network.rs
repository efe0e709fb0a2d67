//! The simulated overlay: the set of joined nodes and the operations that
//! let one query another without real network transport.

use std::collections::HashMap;

use tracing::info;

use crate::domain::entities::Node;
use crate::domain::errors::SimError;
use crate::domain::value_objects::Identifier;
use crate::ports::outbound::RandomSource;

/// A point-in-time view of the overlay's connectivity, ready for
/// serialization.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    /// Identifier-space width shared by every node.
    pub m: u32,
    /// Bucket capacity shared by every node.
    pub k: usize,
    /// Every joined node, in join order.
    pub nodes: Vec<Identifier>,
    /// Directed edges `(observer, observed)`: `observer` holds `observed`
    /// in its routing table.
    pub edges: Vec<(Identifier, Identifier)>,
}

/// The simulated Kademlia overlay.
///
/// Holds every joined [`Node`] and mediates RPCs between them. There is no
/// real transport: a `find_node` call is a direct read of the target
/// node's routing table, and liveness checks performed during bucket
/// insertion always report the incumbent alive, since churn is outside
/// this simulation's scope.
#[derive(Debug, Clone)]
pub struct Network {
    m: u32,
    k: usize,
    nodes: HashMap<Identifier, Node>,
    join_order: Vec<Identifier>,
}

impl Network {
    /// Creates an empty network for an `m`-bit identifier space with
    /// bucket capacity `k`.
    pub fn new(m: u32, k: usize) -> Result<Self, SimError> {
        if k == 0 {
            return Err(SimError::InvalidArgument("k must be > 0".to_string()));
        }
        Ok(Self { m, k, nodes: HashMap::new(), join_order: Vec::new() })
    }

    /// Identifier-space width.
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Bucket capacity.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of joined nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if no node has joined yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` if `id` has already joined.
    pub fn contains(&self, id: &Identifier) -> bool {
        self.nodes.contains_key(id)
    }

    /// Inserts or overwrites a node, recording its identifier in join
    /// order the first time it is seen.
    pub fn insert_node(&mut self, node: Node) {
        let id = *node.id();
        if !self.nodes.contains_key(&id) {
            self.join_order.push(id);
        }
        self.nodes.insert(id, node);
    }

    /// Read access to a joined node.
    pub fn node(&self, id: &Identifier) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Draws a uniformly random already-joined node's identifier.
    pub fn random_peer(&self, rng: &mut dyn RandomSource) -> Option<Identifier> {
        if self.join_order.is_empty() {
            return None;
        }
        let idx = rng.gen_range(self.join_order.len());
        Some(self.join_order[idx])
    }

    /// Simulated `find_node` RPC: delivers `traversed_peers` into
    /// `peer_id`'s own routing table (so the callee learns about the caller
    /// and every intermediate hop), then returns `peer_id`'s own view of the
    /// closest nodes to `target`.
    pub fn find_node(
        &mut self,
        peer_id: &Identifier,
        target: &Identifier,
        traversed_peers: &[Identifier],
        count: usize,
    ) -> Result<Vec<Identifier>, SimError> {
        let node = self
            .nodes
            .get_mut(peer_id)
            .ok_or_else(|| SimError::InvalidArgument(format!("no such node: {peer_id}")))?;
        node.find_node(target, traversed_peers, count)
    }

    /// Simulated `ping` RPC. Always succeeds.
    pub fn ping(&self, peer_id: &Identifier) -> Result<(), SimError> {
        let node = self
            .nodes
            .get(peer_id)
            .ok_or_else(|| SimError::InvalidArgument(format!("no such node: {peer_id}")))?;
        node.ping()
    }

    /// Joins `id` to the network via `bootstrap`, then warms its routing
    /// table with one lookup per entry in `refresh_targets`.
    ///
    /// Registration happens before the lookups run, so `id`'s own routing
    /// table is reachable (and mutable) for every `find_node` RPC those
    /// lookups trigger, including ones that route back through `id` itself.
    /// `refresh_targets` is typically one paired target per bucket,
    /// generated by [`super::coordinator::Coordinator`] so every bucket
    /// gets a chance to fill.
    pub fn join_with_refresh(
        &mut self,
        id: Identifier,
        bootstrap: Identifier,
        alpha: usize,
        refresh_targets: &[Identifier],
    ) -> Result<(), SimError> {
        let node = Node::new(id, self.k)?;
        self.insert_node(node);

        for target in refresh_targets {
            let mut node = self
                .nodes
                .remove(&id)
                .expect("node was just inserted above");
            let result = node.lookup(self, bootstrap, target, self.k, alpha);
            self.nodes.insert(id, node);
            result?;
        }

        info!(node = %id, peer_count = self.len(), "node joined");
        Ok(())
    }

    /// Materializes the connectivity graph for GML export.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let mut edges = Vec::new();
        for &observer in &self.join_order {
            let node = &self.nodes[&observer];
            for observed in node.routing_table().all_peers() {
                edges.push((observer, observed));
            }
        }
        NetworkSnapshot { m: self.m, k: self.k, nodes: self.join_order.clone(), edges }
    }
}
