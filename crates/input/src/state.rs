use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys that steer the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

/// Held movement direction. Each component is -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    /// Combine held keys. Opposite keys cancel out.
    pub fn from_keys(keys: &[Key]) -> Option<Self> {
        let held = |k: Key| keys.contains(&k) as i8;
        let dir = Self::new(held(Key::Right) - held(Key::Left), held(Key::Down) - held(Key::Up));
        (!dir.is_idle()).then_some(dir)
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Direction as a world-space vector (y grows downwards). Not normalized,
    /// so diagonals are faster.
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.dx as f32, self.dy as f32)
    }
}

/// Input snapshot for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Keyboard direction, if any key is held.
    pub direction: Option<Direction>,
    /// World-space point the player was sent to by a click or tap.
    pub target: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            direction: Direction::from_keys(keys),
            target: None,
        }
    }

    pub fn with_target(target: Vec2) -> Self {
        Self {
            direction: None,
            target: Some(target),
        }
    }

    /// Forget the click target (on arrival, on a blocked step, or when the
    /// keyboard takes over).
    pub fn clear_target(&mut self) {
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_combine_into_direction() {
        let d = Direction::from_keys(&[Key::Right, Key::Up]).unwrap();
        assert_eq!(d, Direction::new(1, -1));
        assert_eq!(d.as_vec2(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!(Direction::from_keys(&[Key::Left, Key::Right]), None);
        assert_eq!(Direction::from_keys(&[]), None);
        assert_eq!(
            Direction::from_keys(&[Key::Left, Key::Right, Key::Down]),
            Some(Direction::new(0, 1))
        );
    }

    #[test]
    fn direction_components_are_clamped() {
        assert_eq!(Direction::new(5, -7), Direction::new(1, -1));
    }

    #[test]
    fn target_is_cleared() {
        let mut input = InputState::with_target(Vec2::new(3.0, 4.0));
        assert!(input.target.is_some());
        input.clear_target();
        assert_eq!(input, InputState::new());
    }
}
