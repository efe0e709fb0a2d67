//! The `Node` entity: one participant's view of the overlay, consisting of
//! its identifier and its own routing table.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::errors::SimError;
use crate::domain::kclosest_queue::KClosestQueue;
use crate::domain::network::Network;
use crate::domain::routing_table::RoutingTable;
use crate::domain::value_objects::Identifier;

/// A single participant in the simulated Kademlia overlay.
///
/// Liveness never fails in this simulation (no churn), so every bucket
/// insertion this node performs treats the incumbent as alive; buckets at
/// capacity simply stop accepting new entries rather than evicting.
#[derive(Debug, Clone)]
pub struct Node {
    id: Identifier,
    routing_table: RoutingTable,
}

impl Node {
    /// Creates a node with an empty routing table.
    pub fn new(id: Identifier, k: usize) -> Result<Self, SimError> {
        let routing_table = RoutingTable::new(id, k)?;
        Ok(Self { id, routing_table })
    }

    /// This node's identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Read access to this node's routing table.
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Records contact with `peer`, inserting or refreshing it in the
    /// appropriate bucket. A no-op for `peer == self.id`, delegated to
    /// [`RoutingTable::insert`].
    pub fn observe(&mut self, peer: Identifier) -> Result<(), SimError> {
        self.routing_table.insert(peer, |_| true)?;
        Ok(())
    }

    /// Handles an incoming `find_node` RPC: inserts every peer in
    /// `traversed_peers` into this node's own routing table — so the callee
    /// learns about the caller and every intermediate hop the lookup passed
    /// through — then returns this node's own view of the closest peers to
    /// `target`.
    pub fn find_node(
        &mut self,
        target: &Identifier,
        traversed_peers: &[Identifier],
        count: usize,
    ) -> Result<Vec<Identifier>, SimError> {
        for &peer in traversed_peers {
            self.observe(peer)?;
        }
        self.routing_table.k_closest(target, count)
    }

    /// Handles an incoming `ping` RPC. Always succeeds; liveness failure is
    /// outside this simulation's scope.
    pub fn ping(&self) -> Result<(), SimError> {
        Ok(())
    }

    /// Iterative lookup for `target`, returning up to `k` peers closest to
    /// it found across the network, starting from `bootstrap`.
    ///
    /// Runs in rounds. Each round queries every not-yet-queried candidate in
    /// the working [`KClosestQueue`], in ascending distance order, capped at
    /// `alpha` queries per round; each query passes along the provenance
    /// chain that surfaced the candidate, so the queried peer learns about
    /// every hop between it and this node. Discovered peers are folded into
    /// this node's own routing table and, outside the final pass, back into
    /// the queue. The lookup runs one last pass — querying every remaining
    /// candidate with the `alpha` cap disabled and no further queue growth —
    /// once a round fails to improve the closest known candidate, which
    /// guarantees termination.
    pub fn lookup(
        &mut self,
        network: &mut Network,
        bootstrap: Identifier,
        target: &Identifier,
        k: usize,
        alpha: usize,
    ) -> Result<Vec<Identifier>, SimError> {
        self.observe(bootstrap)?;
        let mut queue = KClosestQueue::new(bootstrap, *target, k, self.id)?;
        let mut queried: HashSet<Identifier> = HashSet::new();
        let mut inserted: HashSet<Identifier> = HashSet::new();
        let mut last_pass = false;
        let mut round = 0u32;

        loop {
            round += 1;
            let closest_before = queue.closest();
            let mut new_queried: Vec<Identifier> = Vec::new();
            let mut found: Vec<(Identifier, Vec<Identifier>)> = Vec::new();

            for peer in queue.iterate() {
                if queried.contains(&peer) {
                    continue;
                }
                queried.insert(peer);

                let mut traversed: Vec<Identifier> = queue.provenance_of(&peer).into_iter().collect();
                traversed.sort();
                let discovered = match network.find_node(&peer, target, &traversed, k) {
                    Ok(discovered) => discovered,
                    Err(SimError::Timeout) => continue,
                    Err(e) => return Err(e),
                };
                found.push((peer, discovered));
                new_queried.push(peer);

                if !last_pass && new_queried.len() > alpha {
                    break;
                }
            }

            debug!(
                round,
                queried = new_queried.len(),
                closest = ?closest_before,
                last_pass,
                "lookup round"
            );

            for (queried_peer, discovered) in found {
                for found_peer in discovered {
                    if found_peer == self.id || inserted.contains(&found_peer) {
                        continue;
                    }
                    self.observe(found_peer)?;
                    if !last_pass {
                        queue.try_add(found_peer, queried_peer)?;
                    }
                    inserted.insert(found_peer);
                }
            }

            if last_pass {
                break;
            }
            if queue.closest() == closest_before {
                last_pass = true;
            }
        }

        Ok(queue.snapshot())
    }
}
