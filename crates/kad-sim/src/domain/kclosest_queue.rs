//! Bounded, distance-ranked candidate set used by [`super::entities::Node::lookup`]
//! to drive the iterative lookup procedure.

use std::collections::{HashMap, HashSet};

use crate::domain::errors::SimError;
use crate::domain::value_objects::{DistanceNode, Identifier};

/// Tracks up to `k` candidates closest to a fixed lookup target, plus a
/// provenance map recording which peers must be credited into a candidate's
/// routing table once that candidate is queried.
///
/// `provenance[peer]` is the set of peers traversed along the discovery path
/// that first surfaced `peer`. A provenance row is kept even after its
/// candidate is displaced from the bounded top-`k` set, since a later,
/// closer query may still need it to credit an even-closer peer.
#[derive(Debug, Clone)]
pub struct KClosestQueue {
    target: Identifier,
    k: usize,
    entries: Vec<DistanceNode>,
    provenance: HashMap<Identifier, HashSet<Identifier>>,
}

impl KClosestQueue {
    /// Creates a queue seeded with exactly `{bootstrap}`, crediting `origin`
    /// (the node running the lookup) as the peer that surfaced it.
    pub fn new(
        bootstrap: Identifier,
        target: Identifier,
        k: usize,
        origin: Identifier,
    ) -> Result<Self, SimError> {
        if k == 0 {
            return Err(SimError::InvalidArgument("k must be > 0".to_string()));
        }
        let dn = DistanceNode::new(bootstrap, target)?;
        let mut provenance = HashMap::new();
        provenance.insert(bootstrap, HashSet::from([origin]));
        Ok(Self { target, k, entries: vec![dn], provenance })
    }

    /// Attempts to add `candidate`, crediting `queried_peer` (plus whatever
    /// peers credited `queried_peer` itself) into its provenance row.
    ///
    /// Returns `Ok(false)` only when `candidate` is already present (by
    /// identifier). Otherwise the candidate is inserted into the sorted set
    /// and, if that pushes the set past `k` entries, the farthest entry is
    /// dropped — but its provenance row is kept.
    pub fn try_add(&mut self, candidate: Identifier, queried_peer: Identifier) -> Result<bool, SimError> {
        if self.entries.iter().any(|dn| dn.node_id == candidate) {
            return Ok(false);
        }

        let dn = DistanceNode::new(candidate, self.target)?;
        self.entries.push(dn);
        self.entries.sort_by(|a, b| a.cmp(b));

        let mut credited = self.provenance.get(&queried_peer).cloned().unwrap_or_default();
        credited.insert(queried_peer);
        self.provenance.insert(candidate, credited);

        while self.entries.len() > self.k {
            self.entries.pop();
        }
        Ok(true)
    }

    /// The provenance set recorded for `peer`, or empty if `peer` was never
    /// added through [`KClosestQueue::try_add`] (e.g. the seed bootstrap
    /// uses the constructor's `origin` instead).
    pub fn provenance_of(&self, peer: &Identifier) -> HashSet<Identifier> {
        self.provenance.get(peer).cloned().unwrap_or_default()
    }

    /// The closest candidate currently held, if any.
    pub fn closest(&self) -> Option<Identifier> {
        self.entries.first().map(|dn| dn.node_id)
    }

    /// Peers currently held, in ascending distance order. A snapshot at the
    /// moment of the call: later `try_add` calls do not retroactively affect
    /// a `Vec` already returned.
    pub fn iterate(&self) -> Vec<Identifier> {
        self.entries.iter().map(|dn| dn.node_id).collect()
    }

    /// Snapshot of the held candidates, closest first. The lookup's final
    /// return value.
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.iterate()
    }

    /// Number of candidates currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no candidates are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
