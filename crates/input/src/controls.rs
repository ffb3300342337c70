use serde::{Deserialize, Serialize};

use crate::InputError;
use crate::action::MoveKey;

/// Input tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// World units moved per frame while a movement key is held.
    pub move_speed: f32,
    /// Mouse deltas are divided by this before being applied as degrees.
    pub mouse_divisor: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.02,
            mouse_divisor: 5.0,
        }
    }
}

impl ControlConfig {
    /// Reject tuning that would poison the camera: the divisor must be a
    /// positive finite number and the speed finite.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.mouse_divisor.is_finite() && self.mouse_divisor > 0.0) {
            return Err(InputError::MouseDivisor(self.mouse_divisor));
        }
        if !self.move_speed.is_finite() {
            return Err(InputError::MoveSpeed(self.move_speed));
        }
        Ok(())
    }
}

/// Tracks held movement keys as per-frame forward/right amounts.
///
/// Each axis holds a single value: pressing a key overwrites it, releasing
/// either key on that axis zeroes it. There is no acceleration or smoothing.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    config: ControlConfig,
    forward: f32,
    right: f32,
}

impl Controls {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            forward: 0.0,
            right: 0.0,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn key(&mut self, key: MoveKey, pressed: bool) {
        let speed = self.config.move_speed;
        match (key, pressed) {
            (MoveKey::Forward, true) => self.forward = speed,
            (MoveKey::Backward, true) => self.forward = -speed,
            (MoveKey::Left, true) => self.right = -speed,
            (MoveKey::Right, true) => self.right = speed,
            (MoveKey::Forward | MoveKey::Backward, false) => self.forward = 0.0,
            (MoveKey::Left | MoveKey::Right, false) => self.right = 0.0,
        }
        tracing::trace!(?key, pressed, forward = self.forward, right = self.right, "movement");
    }

    /// Convert a raw mouse delta into camera spin, in degrees.
    pub fn look(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx / self.config.mouse_divisor, dy / self.config.mouse_divisor)
    }

    /// Current `(forward, right)` amounts to apply this frame.
    pub fn movement(&self) -> (f32, f32) {
        (self.forward, self.right)
    }

    /// Drop all held movement, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.forward = 0.0;
        self.right = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_controls_do_not_move() {
        let controls = Controls::default();
        assert_eq!(controls.movement(), (0.0, 0.0));
    }

    #[test]
    fn held_keys_produce_fixed_speed() {
        let mut controls = Controls::default();
        controls.key(MoveKey::Forward, true);
        controls.key(MoveKey::Right, true);
        assert_eq!(controls.movement(), (0.02, 0.02));
        controls.key(MoveKey::Backward, true);
        controls.key(MoveKey::Left, true);
        assert_eq!(controls.movement(), (-0.02, -0.02));
    }

    #[test]
    fn release_zeroes_axis() {
        let mut controls = Controls::default();
        controls.key(MoveKey::Forward, true);
        controls.key(MoveKey::Left, true);
        controls.key(MoveKey::Forward, false);
        assert_eq!(controls.movement(), (0.0, -0.02));
        // Releasing the opposite key on an axis also stops it.
        controls.key(MoveKey::Right, false);
        assert_eq!(controls.movement(), (0.0, 0.0));
    }

    #[test]
    fn look_divides_by_configured_divisor() {
        let controls = Controls::new(ControlConfig {
            move_speed: 1.0,
            mouse_divisor: 4.0,
        });
        assert_eq!(controls.look(8.0, -2.0), (2.0, -0.5));
        assert_eq!(Controls::default().look(10.0, 5.0), (2.0, 1.0));
    }

    #[test]
    fn non_positive_divisor_is_rejected() {
        for divisor in [0.0, -0.0, -5.0, f32::NAN, f32::INFINITY] {
            let config = ControlConfig {
                mouse_divisor: divisor,
                ..ControlConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(InputError::MouseDivisor(_))),
                "divisor {divisor}"
            );
        }
        let config = ControlConfig {
            move_speed: f32::NAN,
            ..ControlConfig::default()
        };
        assert!(matches!(config.validate(), Err(InputError::MoveSpeed(_))));
        assert!(ControlConfig::default().validate().is_ok());
    }

    #[test]
    fn clear_stops_movement() {
        let mut controls = Controls::default();
        controls.key(MoveKey::Forward, true);
        controls.key(MoveKey::Right, true);
        controls.clear();
        assert_eq!(controls.movement(), (0.0, 0.0));
    }
}
