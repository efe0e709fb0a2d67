//! Service layer: the driving-port implementation wrapping the domain.

mod core;

pub use core::SimulationService;
