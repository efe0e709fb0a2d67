//! The full routing table: one [`Bucket`] per bit of the identifier space.

use crate::domain::errors::SimError;
use crate::domain::value_objects::{DistanceNode, Identifier};

use super::bucket::{Bucket, InsertOutcome};

/// Snapshot of routing-table occupancy, used for diagnostics and the
/// optional CLI `--stats` output.
#[derive(Debug, Clone, Default)]
pub struct RoutingTableStats {
    /// Total peers held across every bucket.
    pub total_peers: usize,
    /// Number of buckets holding at least one peer.
    pub buckets_used: usize,
    /// Peer count for each bucket, indexed by bucket number.
    pub peers_per_bucket: Vec<usize>,
}

/// A Kademlia routing table for one node: `m` buckets, each holding up to
/// `k` peers, partitioned by the bit length of the XOR distance to the
/// table's owner.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    local_id: Identifier,
    buckets: Vec<Bucket>,
}

impl RoutingTable {
    /// Builds an empty routing table for `local_id`, with one bucket per
    /// bit of its identifier width and capacity `k` per bucket.
    pub fn new(local_id: Identifier, k: usize) -> Result<Self, SimError> {
        let buckets = (0..local_id.bits())
            .map(|_| Bucket::new(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { local_id, buckets })
    }

    /// The identifier this table is routing on behalf of.
    pub fn local_id(&self) -> &Identifier {
        &self.local_id
    }

    /// Number of buckets (equal to the identifier width `m`).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket index an identifier falls into relative to `local_id`:
    /// `bit_length(distance) - 1`, so bucket 0 holds the closest peers and
    /// the last bucket holds the farthest.
    fn bucket_index(&self, id: &Identifier) -> Result<usize, SimError> {
        if *id == self.local_id {
            return Err(SimError::InvalidArgument(
                "cannot bucket a node's own identifier".to_string(),
            ));
        }
        let distance = self.local_id.distance(id)?;
        Ok((distance.bit_length() - 1) as usize)
    }

    /// Inserts or refreshes `id`, calling `ping` only if its bucket is full
    /// and the least-recently-seen entry must be challenged.
    ///
    /// A no-op when `id` is this table's own owner: a node never appears in
    /// its own routing table.
    pub fn insert<F>(&mut self, id: Identifier, ping: F) -> Result<InsertOutcome, SimError>
    where
        F: FnMut(&Identifier) -> bool,
    {
        if id == self.local_id {
            return Ok(InsertOutcome::Rejected);
        }
        let idx = self.bucket_index(&id)?;
        Ok(self.buckets[idx].insert(id, ping))
    }

    /// `true` if `id` is present in its bucket.
    pub fn contains(&self, id: &Identifier) -> bool {
        match self.bucket_index(id) {
            Ok(idx) => self.buckets[idx].contains(id),
            Err(_) => false,
        }
    }

    /// Total number of peers held across every bucket.
    pub fn total_peer_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Every peer identifier held across every bucket, in no particular
    /// order. Used to materialize the connectivity graph for GML output.
    pub fn all_peers(&self) -> Vec<Identifier> {
        self.buckets.iter().flat_map(Bucket::iter).copied().collect()
    }

    /// Occupancy statistics for diagnostics.
    pub fn stats(&self) -> RoutingTableStats {
        let peers_per_bucket: Vec<usize> = self.buckets.iter().map(Bucket::len).collect();
        RoutingTableStats {
            total_peers: peers_per_bucket.iter().sum(),
            buckets_used: peers_per_bucket.iter().filter(|&&n| n > 0).count(),
            peers_per_bucket,
        }
    }

    /// Returns up to `count` peers closest to `target` by XOR distance.
    ///
    /// Starts scanning from `target`'s own bucket index and widens outward
    /// one bucket at a time on each side, stopping once a whole widened
    /// ring of buckets has been scanned and at least `count` candidates
    /// have been collected. The collected candidates are then sorted by
    /// true distance and truncated, since a bucket closer in index is not
    /// guaranteed to contain peers closer in distance than a farther
    /// bucket's best entries.
    pub fn k_closest(&self, target: &Identifier, count: usize) -> Result<Vec<Identifier>, SimError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let start = if *target == self.local_id {
            0
        } else {
            self.bucket_index(target)?
        };

        let mut candidates: Vec<Identifier> = Vec::new();
        let mut radius = 0usize;
        loop {
            let lo = start.saturating_sub(radius);
            let hi = (start + radius).min(self.buckets.len() - 1);

            candidates.clear();
            for bucket in &self.buckets[lo..=hi] {
                candidates.extend(bucket.iter().copied());
            }

            let exhausted_all_buckets = lo == 0 && hi == self.buckets.len() - 1;
            if candidates.len() >= count || exhausted_all_buckets {
                break;
            }
            radius += 1;
        }

        let mut ranked: Vec<DistanceNode> = candidates
            .into_iter()
            .map(|id| DistanceNode::new(id, *target))
            .collect::<Result<_, _>>()?;
        ranked.sort();
        ranked.truncate(count);
        Ok(ranked.into_iter().map(|dn| dn.node_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(bits: u32, v: u64) -> Identifier {
        Identifier::from_u64(bits, v).unwrap()
    }

    #[test]
    fn new_table_has_m_buckets() {
        let table = RoutingTable::new(id(10, 0), 4).unwrap();
        assert_eq!(table.bucket_count(), 10);
    }

    #[test]
    fn insert_places_into_expected_bucket() {
        let mut table = RoutingTable::new(id(8, 0), 4).unwrap();
        table.insert(id(8, 1), |_| true).unwrap();
        // distance(0,1) = 1, bit_length = 1, bucket index = 0.
        assert!(table.contains(&id(8, 1)));
        assert_eq!(table.stats().peers_per_bucket[0], 1);
    }

    #[test]
    fn insert_is_a_no_op_for_the_local_id() {
        let mut table = RoutingTable::new(id(8, 5), 4).unwrap();
        assert_eq!(table.insert(id(8, 5), |_| true).unwrap(), InsertOutcome::Rejected);
        assert_eq!(table.total_peer_count(), 0);
        assert!(!table.contains(&id(8, 5)));
    }

    #[test]
    fn k_closest_returns_sorted_by_true_distance() {
        let mut table = RoutingTable::new(id(8, 0), 20).unwrap();
        for v in [1u64, 2, 4, 8, 16, 32, 64, 128] {
            table.insert(id(8, v), |_| true).unwrap();
        }
        let closest = table.k_closest(&id(8, 0), 3).unwrap();
        assert_eq!(closest, vec![id(8, 1), id(8, 2), id(8, 4)]);
    }

    #[test]
    fn k_closest_caps_at_requested_count() {
        let mut table = RoutingTable::new(id(8, 0), 20).unwrap();
        for v in 1u64..=10 {
            table.insert(id(8, v), |_| true).unwrap();
        }
        assert_eq!(table.k_closest(&id(8, 0), 3).unwrap().len(), 3);
    }

    #[test]
    fn k_closest_handles_fewer_peers_than_requested() {
        let mut table = RoutingTable::new(id(8, 0), 20).unwrap();
        table.insert(id(8, 9), |_| true).unwrap();
        assert_eq!(table.k_closest(&id(8, 0), 5).unwrap().len(), 1);
    }
}
