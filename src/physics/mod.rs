//! Thin physics collaborator: velocity, gravity, ground probing.
//!
//! The controller treats physics as a black box that owns position and
//! velocity and answers "is the feet probe touching level geometry". This
//! module is that box, kept deliberately small: gravity with a terminal
//! clamp, explicit Euler integration, a snap onto ground when falling into
//! it, and an AABB overlap probe under the character's collider.

use bevy::prelude::*;

use crate::character::Character;

pub const GRAVITY: f32 = -30.0;
pub const TERMINAL_FALL_SPEED: f32 = -50.0;
/// How far below the collider the contact probe reaches.
pub const PROBE_DEPTH: f32 = 0.08;

/// Velocity in world units per second. Written by both the motion step and
/// the integrator.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity(pub Vec2);

/// Result of the feet probe, refreshed before each motion step.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct GroundContact(pub bool);

/// Marker for level geometry the feet probe tests against.
#[derive(Component, Clone, Copy, Debug)]
pub struct Ground {
    pub half_extents: Vec2,
}

/// Overlap test between the character's feet strip and one ground slab.
#[must_use]
fn feet_touch_ground(
    character_pos: Vec2,
    character: &Character,
    ground_pos: Vec2,
    ground: &Ground,
) -> bool {
    let half_width = character.collider.width * 0.5;
    // Probe strip: from the collider's bottom edge down by PROBE_DEPTH.
    let probe_top = character_pos.y - character.collider.height * 0.5;
    let probe_bottom = probe_top - PROBE_DEPTH;

    let ground_top = ground_pos.y + ground.half_extents.y;
    let ground_bottom = ground_pos.y - ground.half_extents.y;
    let ground_left = ground_pos.x - ground.half_extents.x;
    let ground_right = ground_pos.x + ground.half_extents.x;

    let overlaps_x =
        character_pos.x + half_width > ground_left && character_pos.x - half_width < ground_right;
    let overlaps_y = probe_bottom <= ground_top && probe_top >= ground_bottom;
    overlaps_x && overlaps_y
}

/// Refresh `GroundContact` from the feet probe. Runs first in the fixed
/// step so the motion controller sees this tick's contact state.
#[allow(clippy::needless_pass_by_value)]
pub fn ground_contact_probe(
    mut characters: Query<(&Transform, &Character, &mut GroundContact)>,
    grounds: Query<(&Transform, &Ground)>,
) {
    for (transform, character, mut contact) in &mut characters {
        let pos = transform.translation.truncate();
        contact.0 = grounds
            .iter()
            .any(|(gt, g)| feet_touch_ground(pos, character, gt.translation.truncate(), g));
    }
}

/// Apply gravity while airborne and integrate translation, snapping the
/// character onto a ground slab when a fall carries the feet through its
/// top surface.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_motion(
    time: Res<Time>,
    mut characters: Query<(&mut Transform, &mut Velocity, &GroundContact, &Character)>,
    grounds: Query<(&Transform, &Ground), Without<Character>>,
) {
    let dt = time.delta_seconds();
    for (mut transform, mut velocity, contact, character) in &mut characters {
        if !contact.0 {
            velocity.0.y += GRAVITY * dt;
            if velocity.0.y < TERMINAL_FALL_SPEED {
                velocity.0.y = TERMINAL_FALL_SPEED;
            }
        } else if velocity.0.y < 0.0 {
            velocity.0.y = 0.0;
        }

        let half_height = character.collider.height * 0.5;
        let half_width = character.collider.width * 0.5;
        let old_feet = transform.translation.y - half_height;
        let new_pos = transform.translation.truncate() + velocity.0 * dt;
        let new_feet = new_pos.y - half_height;

        let mut landed_on: Option<f32> = None;
        if velocity.0.y < 0.0 {
            for (gt, ground) in &grounds {
                let top = gt.translation.y + ground.half_extents.y;
                let left = gt.translation.x - ground.half_extents.x;
                let right = gt.translation.x + ground.half_extents.x;
                let overlaps_x = new_pos.x + half_width > left && new_pos.x - half_width < right;
                if overlaps_x && old_feet >= top && new_feet < top {
                    landed_on = Some(top);
                    break;
                }
            }
        }

        transform.translation.x = new_pos.x;
        if let Some(top) = landed_on {
            transform.translation.y = top + half_height;
            velocity.0.y = 0.0;
        } else {
            transform.translation.y = new_pos.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::NullSink;
    use crate::character::ColliderShape;

    fn character() -> Character {
        Character::new(20.0, 12.0, ColliderShape::new(0.9, 1.8), &mut NullSink)
    }

    #[test]
    fn probe_detects_slab_under_feet() {
        let ch = character();
        let ground = Ground {
            half_extents: Vec2::new(10.0, 0.5),
        };
        // Feet resting exactly on the slab top (slab top at y = 0.5).
        let standing = Vec2::new(0.0, 0.5 + 0.9);
        assert!(feet_touch_ground(standing, &ch, Vec2::ZERO, &ground));

        // Well above the probe depth: airborne.
        let airborne = Vec2::new(0.0, 0.5 + 0.9 + 1.0);
        assert!(!feet_touch_ground(airborne, &ch, Vec2::ZERO, &ground));

        // Past the slab edge horizontally.
        let off_edge = Vec2::new(11.0, 0.5 + 0.9);
        assert!(!feet_touch_ground(off_edge, &ch, Vec2::ZERO, &ground));
    }

    #[test]
    fn probe_tracks_posture_changes() {
        let mut ch = character();
        let ground = Ground {
            half_extents: Vec2::new(10.0, 0.5),
        };
        let pos = Vec2::new(0.0, 0.5 + 0.9);
        assert!(feet_touch_ground(pos, &ch, Vec2::ZERO, &ground));

        // Flight posture halves the collider height, lifting the feet
        // probe off the slab at the same transform.
        ch.collider.toggle_posture();
        assert!(!feet_touch_ground(pos, &ch, Vec2::ZERO, &ground));
    }
}
