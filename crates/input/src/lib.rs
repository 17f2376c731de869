//! Input: per-tick intent handed to the simulation as a plain value.
//!
//! # Invariants
//! - No global input state; the caller owns `InputState` and threads it in.
//! - Raw device events are mapped here, never interpreted by the collision core.

pub mod state;

pub use state::{Direction, InputState, Key};
