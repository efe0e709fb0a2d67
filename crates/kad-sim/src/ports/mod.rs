//! Ports layer: trait seams between the domain and the outside world.
//!
//! - **Driving ports (inbound):** the API this crate exposes to consumers.
//! - **Driven ports (outbound):** capabilities the domain depends on but
//!   does not implement, so production and test code can supply different
//!   adapters for the same trait.

pub mod inbound;
pub mod outbound;

pub use inbound::SimulationApi;
pub use outbound::RandomSource;
