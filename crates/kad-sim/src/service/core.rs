//! `SimulationService`: the driving-port implementation that wraps a
//! `Coordinator` and exposes it through `SimulationApi`.

use crate::domain::{Coordinator, NetworkSnapshot, SimError};
use crate::ports::inbound::SimulationApi;
use crate::ports::outbound::RandomSource;

/// Runs a Kademlia construction simulation for a fixed `(m, k)` identifier
/// space and bucket capacity, driving a [`Coordinator`] through the
/// [`SimulationApi`] port.
pub struct SimulationService<R: RandomSource> {
    coordinator: Coordinator<R>,
}

impl<R: RandomSource> SimulationService<R> {
    /// Creates a service for an `m`-bit identifier space with bucket
    /// capacity `k`, drawing randomness from `rng`.
    pub fn new(m: u32, k: usize, rng: R) -> Result<Self, SimError> {
        Ok(Self { coordinator: Coordinator::new(m, k, rng)? })
    }
}

impl<R: RandomSource> SimulationApi for SimulationService<R> {
    fn run(&mut self, n: u64) -> Result<NetworkSnapshot, SimError> {
        self.coordinator.run(n)
    }
}
