//! Domain error taxonomy for the Kademlia simulator.

use thiserror::Error;

/// Errors produced by the simulation engine.
///
/// `Timeout` is never constructed by the bundled random source (pings and
/// `find_node` calls always succeed in this simulation) but the variant is
/// kept reachable so bucket-eviction and lookup-skip code paths stay
/// exercisable by tests that stub a failing RPC.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A constructor or operation received a parameter outside its
    /// documented range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The coordinator exhausted its identifier-collision retry budget
    /// while trying to join a new node.
    #[error("identifier space exhausted after {attempts} collision retries")]
    IdentifierSpaceExhausted {
        /// Number of consecutive identifier collisions observed.
        attempts: u64,
    },

    /// A simulated RPC (`ping` or `find_node`) failed to complete. Always
    /// recovered locally at the call site.
    #[error("RPC timed out")]
    Timeout,

    /// Two `DistanceNode`s with different targets were compared.
    #[error("compared DistanceNodes with different targets")]
    IncomparableTargets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = SimError::InvalidArgument("k must be > 0".to_string());
        assert!(err.to_string().contains("k must be > 0"));
    }

    #[test]
    fn identifier_space_exhausted_reports_attempts() {
        let err = SimError::IdentifierSpaceExhausted { attempts: 1_000_001 };
        assert!(err.to_string().contains("1000001"));
    }
}
