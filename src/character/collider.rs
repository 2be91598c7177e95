//! Collider shape and orientation helpers.

use bevy::math::Vec2;

use crate::character::Character;

/// Axis-aligned collision volume descriptor.
///
/// Height is either `normal_height` (standing posture) or equal to `width`
/// (flight posture). The posture change is a toggle, not a stack: entering
/// flight posture twice without an intervening exit leaves the shape
/// desynced from the labeled state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderShape {
    pub width: f32,
    pub height: f32,
    normal_height: f32,
}

impl ColliderShape {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            normal_height: height,
        }
    }

    /// Flip between standing and flight posture. A square shape is taken to
    /// be in flight posture and restored to the standing baseline; anything
    /// else is squashed to a square.
    pub fn toggle_posture(&mut self) {
        if self.width == self.height {
            self.height = self.normal_height;
        } else {
            self.height = self.width;
        }
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[must_use]
    pub fn normal_height(&self) -> f32 {
        self.normal_height
    }

    #[must_use]
    pub fn in_flight_posture(&self) -> bool {
        self.width == self.height
    }
}

impl Character {
    /// Flip the facing sign when the input direction disagrees with it.
    pub fn face_toward(&mut self, horizontal: f32) {
        let moving_left = horizontal < 0.0;
        if (moving_left && self.facing > 0.0) || (!moving_left && self.facing < 0.0) {
            self.facing = -self.facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_shrinks_then_restores() {
        let mut shape = ColliderShape::new(0.9, 1.8);
        shape.toggle_posture();
        assert_eq!(shape.height, shape.width);
        assert!(shape.in_flight_posture());
        shape.toggle_posture();
        assert_eq!(shape.height, 1.8);
        assert!(!shape.in_flight_posture());
    }

    #[test]
    fn toggle_on_square_shape_restores_baseline() {
        // A shape that starts square is treated as already being in flight
        // posture, so the first toggle restores the baseline height.
        let mut shape = ColliderShape::new(1.0, 1.0);
        shape.toggle_posture();
        assert_eq!(shape.height, 1.0);
    }
}
