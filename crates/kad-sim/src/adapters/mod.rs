//! Adapters layer: concrete implementations of the outbound ports and the
//! output format, kept separate from the domain so swapping either never
//! touches Kademlia logic.

pub mod gml;
pub mod rng;
