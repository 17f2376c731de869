//! Simulation: fixed-timestep tick driver, behaviors and player intent.
//!
//! # Invariants
//! - Every position change goes through the kernel's movement resolver.
//! - One resolver pass per entity behavior per tick, in world order.
//! - Input is an explicit per-tick value, never global state.

pub mod behavior;
pub mod clock;
pub mod config;
pub mod error;
pub mod simulation;

pub use behavior::{Behavior, WalkInCircle, drive_player};
pub use clock::FixedTimestep;
pub use config::SimConfig;
pub use error::SimError;
pub use simulation::{Simulation, TickStats};

pub fn crate_info() -> &'static str {
    "tilestep-sim v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("sim"));
    }
}
