//! Domain layer: pure Kademlia logic, no I/O, no wall-clock access.
//!
//! Everything here is deterministic given its inputs (including the
//! injected [`crate::ports::outbound::RandomSource`]), so it can be tested
//! and reasoned about without a network or a filesystem.

pub mod coordinator;
pub mod entities;
pub mod errors;
pub mod kclosest_queue;
pub mod network;
pub mod routing_table;
pub mod services;
pub mod value_objects;

pub use coordinator::Coordinator;
pub use entities::Node;
pub use errors::SimError;
pub use kclosest_queue::KClosestQueue;
pub use network::{Network, NetworkSnapshot};
pub use routing_table::{Bucket, InsertOutcome, RoutingTable, RoutingTableStats};
pub use services::{bucket_index, sort_by_distance, xor_distance};
pub use value_objects::{DistanceNode, Identifier};
