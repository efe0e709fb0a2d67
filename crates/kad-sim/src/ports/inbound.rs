//! Driving ports (inbound API): what this crate exposes to its consumers.

use crate::domain::{NetworkSnapshot, SimError};

/// The API a caller (the CLI binary, or a test) drives a simulation run
/// through.
///
/// A single implementor, [`crate::service::SimulationService`], wraps a
/// [`crate::domain::Coordinator`] and whatever outbound ports it needs.
pub trait SimulationApi {
    /// Runs the simulation to completion, joining `n` nodes, and returns
    /// the resulting network's connectivity snapshot.
    fn run(&mut self, n: u64) -> Result<NetworkSnapshot, SimError>;
}
