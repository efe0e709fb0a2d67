//! # Kademlia Overlay-Network Construction Simulator
//!
//! Builds an in-memory Kademlia-style overlay by joining `n` nodes one at a
//! time against already-joined bootstrap peers, then exports the resulting
//! routing-table connectivity as a graph. There is no real transport, no
//! churn, and no stored values: every RPC is a direct call into the target
//! node's own routing table, and the only externally visible artifact of a
//! run is the connectivity snapshot the adapters layer serializes to GML.
//!
//! ## Architecture
//!
//! The crate follows the hexagonal layout used across this workspace:
//! - **Domain layer:** pure Kademlia logic (`Identifier`, `Bucket`,
//!   `RoutingTable`, `DistanceNode`, `KClosestQueue`, `Node`, `Network`,
//!   `Coordinator`). No I/O, no wall-clock access.
//! - **Ports layer:** an inbound `SimulationApi` driving port, and an
//!   outbound `RandomSource` driven port the domain depends on but does not
//!   implement.
//! - **Service layer:** `SimulationService`, the driving-port implementation
//!   that wraps a `Coordinator` and exposes `run()`.
//! - **Adapters layer:** a `ChaCha8Rng`-backed `RandomSource`, and the GML
//!   serializer, a pure function from `NetworkSnapshot` to `String`.
//!
//! ## Example
//!
//! ```rust
//! use kad_sim::adapters::rng::seeded_rng;
//! use kad_sim::ports::SimulationApi;
//! use kad_sim::service::SimulationService;
//!
//! let rng = seeded_rng(42);
//! let mut service = SimulationService::new(8, 4, rng).unwrap();
//! let snapshot = service.run(16).unwrap();
//! assert_eq!(snapshot.nodes.len(), 16);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    Bucket, Coordinator, DistanceNode, Identifier, InsertOutcome, KClosestQueue, Network,
    NetworkSnapshot, Node, RoutingTable, RoutingTableStats, SimError,
};
pub use ports::{RandomSource, SimulationApi};
pub use service::SimulationService;
