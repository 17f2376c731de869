//! Developer Tooling: read-only world inspection.
//!
//! # Invariants
//! - Tools only read world state; they never commit positions.

mod inspector;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "tilestep-tools v0.1.0"
}
