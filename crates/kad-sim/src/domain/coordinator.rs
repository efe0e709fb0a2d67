//! The centralized driver that grows a [`Network`] one node at a time.

use tracing::{error, warn};

use crate::domain::errors::SimError;
use crate::domain::network::{Network, NetworkSnapshot};
use crate::domain::value_objects::{Identifier, MAX_BITS};
use crate::ports::outbound::RandomSource;

/// Kademlia's standard lookup parallelism bound.
const ALPHA: usize = 5;

/// Hard cap on identifier-collision retries across the coordinator's
/// entire run, not per node.
const MAX_COLLISION_RETRIES: u64 = 1_000_000;

/// Drives the simulation: generates an `m`-bit identifier for each of `n`
/// nodes, joins it to the network via an already-joined bootstrap peer, and
/// warms its routing table with bucket-targeted refresh lookups.
pub struct Coordinator<R: RandomSource> {
    network: Network,
    rng: R,
    collision_retries: u64,
}

impl<R: RandomSource> Coordinator<R> {
    /// Creates a coordinator for an `m`-bit space with bucket capacity `k`.
    pub fn new(m: u32, k: usize, rng: R) -> Result<Self, SimError> {
        if m == 0 || m > MAX_BITS {
            return Err(SimError::InvalidArgument(format!(
                "m must be in 1..={MAX_BITS}, got {m}"
            )));
        }
        Ok(Self { network: Network::new(m, k)?, rng, collision_retries: 0 })
    }

    /// Runs the full simulation: joins `n` nodes and returns the resulting
    /// network.
    ///
    /// Phase one joins the first node directly, with no bootstrap peer and
    /// no refresh lookups (there is nothing yet to look up). Phase two
    /// joins every subsequent node against a uniformly random already-
    /// joined peer, then runs a batch of bucket-targeted paired lookups
    /// through that bootstrap to warm its table.
    pub fn run(&mut self, n: u64) -> Result<NetworkSnapshot, SimError> {
        if n == 0 {
            return Err(SimError::InvalidArgument("n must be > 0".to_string()));
        }
        if !identifier_space_suffices(self.network.m(), n) {
            return Err(SimError::InvalidArgument(format!(
                "identifier space of {} bits cannot fit {n} nodes",
                self.network.m()
            )));
        }

        let first_id = self.unique_identifier()?;
        let node = crate::domain::entities::Node::new(first_id, self.network.k())?;
        self.network.insert_node(node);

        for _ in 1..n {
            let id = self.unique_identifier()?;
            let bootstrap = self
                .network
                .random_peer(&mut self.rng)
                .expect("network is non-empty after phase one");
            let refresh_targets = self.paired_refresh_targets(&id)?;
            self.network.join_with_refresh(id, bootstrap, ALPHA, &refresh_targets)?;
        }

        Ok(self.network.snapshot())
    }

    /// Draws identifiers until one does not collide with an already-joined
    /// node, counting every collision against the run-wide retry budget.
    fn unique_identifier(&mut self) -> Result<Identifier, SimError> {
        loop {
            let candidate = Identifier::new_random(self.network.m(), &mut self.rng)?;
            if !self.network.contains(&candidate) {
                return Ok(candidate);
            }
            self.collision_retries += 1;
            warn!(attempts = self.collision_retries, "identifier collision, retrying");
            if self.collision_retries >= MAX_COLLISION_RETRIES {
                error!(attempts = self.collision_retries, "identifier space exhausted");
                return Err(SimError::IdentifierSpaceExhausted { attempts: self.collision_retries });
            }
        }
    }

    /// Synthesizes refresh targets for every bucket of a newly joining
    /// node, `p = max(1, floor(k * 0.1))` targets per bucket, so a handful
    /// of lookups give every bucket a chance to fill.
    fn paired_refresh_targets(&mut self, id: &Identifier) -> Result<Vec<Identifier>, SimError> {
        let k = self.network.k();
        let p = ((k as f64) * 0.1).floor().max(1.0) as usize;
        let mut targets = Vec::with_capacity((id.bits() as usize) * p);
        for bucket in 0..id.bits() {
            for _ in 0..p {
                targets.push(id.random_in_bucket(bucket, &mut self.rng)?);
            }
        }
        Ok(targets)
    }

    /// Read access to the network built so far.
    pub fn network(&self) -> &Network {
        &self.network
    }
}

/// `true` if an `m`-bit identifier space has room for `n` distinct
/// identifiers, i.e. `2^m >= n`. Computed without overflow for `m` up to
/// [`MAX_BITS`] and `n` up to `u64::MAX`.
fn identifier_space_suffices(m: u32, n: u64) -> bool {
    if m >= u64::BITS {
        return true;
    }
    (1u64 << m) >= n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn run_rejects_zero_nodes() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut coordinator = Coordinator::new(8, 4, rng).unwrap();
        assert!(coordinator.run(0).is_err());
    }

    #[test]
    fn run_joins_every_node() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut coordinator = Coordinator::new(8, 4, rng).unwrap();
        let snapshot = coordinator.run(10).unwrap();
        assert_eq!(snapshot.nodes.len(), 10);
    }

    #[test]
    fn run_produces_deterministic_output_for_a_fixed_seed() {
        let rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut coordinator_a = Coordinator::new(8, 4, rng_a).unwrap();
        let snapshot_a = coordinator_a.run(12).unwrap();

        let rng_b = ChaCha8Rng::seed_from_u64(42);
        let mut coordinator_b = Coordinator::new(8, 4, rng_b).unwrap();
        let snapshot_b = coordinator_b.run(12).unwrap();

        assert_eq!(snapshot_a.nodes, snapshot_b.nodes);
        assert_eq!(snapshot_a.edges, snapshot_b.edges);
    }

    #[test]
    fn every_joined_node_knows_about_the_bootstrap_chain() {
        let rng = ChaCha8Rng::seed_from_u64(7);
        let mut coordinator = Coordinator::new(10, 4, rng).unwrap();
        let snapshot = coordinator.run(20).unwrap();
        assert!(snapshot.edges.len() > 0);
    }

    #[test]
    fn new_rejects_out_of_range_m() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Coordinator::new(0, 4, rng).is_err());
        let rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Coordinator::new(257, 4, rng).is_err());
    }

    #[test]
    fn run_rejects_n_that_does_not_fit_the_identifier_space() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut coordinator = Coordinator::new(2, 4, rng).unwrap();
        // 2-bit space holds only 4 identifiers.
        assert!(coordinator.run(5).is_err());
    }

    #[test]
    fn run_accepts_n_exactly_filling_the_identifier_space() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut coordinator = Coordinator::new(2, 4, rng).unwrap();
        assert!(coordinator.run(4).is_ok());
    }
}
