use std::path::Path;

use serde::{Deserialize, Serialize};
use tilestep_common::settings::{MAX_FRAME_TIME, TICK_RATE};

use crate::error::SimError;

/// Simulation configuration: tick rate, frame clamp and arrival tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed simulation ticks per second.
    pub tick_rate: u32,
    /// Longest frame time fed to the accumulator; longer frames are clamped to it.
    pub max_frame_time: f32,
    /// Distance under which a click target counts as reached.
    pub arrive_epsilon: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            max_frame_time: MAX_FRAME_TIME,
            arrive_epsilon: 0.05,
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    pub fn step(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Load a JSON config; missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_settings() {
        let c = SimConfig::default();
        assert_eq!(c.tick_rate, 60);
        assert!((c.step() - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(c.max_frame_time, 0.25);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: SimConfig = serde_json::from_str(r#"{ "tick_rate": 30 }"#).unwrap();
        assert_eq!(c.tick_rate, 30);
        assert_eq!(c.arrive_epsilon, SimConfig::default().arrive_epsilon);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(&path, r#"{ "max_frame_time": 0.1 }"#).unwrap();
        let c = SimConfig::load(&path).unwrap();
        assert_eq!(c.max_frame_time, 0.1);
        assert!(matches!(SimConfig::load(dir.path().join("nope.json")), Err(SimError::Io(_))));
    }

    #[test]
    fn zero_tick_rate_does_not_divide_by_zero() {
        let c = SimConfig {
            tick_rate: 0,
            ..SimConfig::default()
        };
        assert_eq!(c.step(), 1.0);
    }
}
