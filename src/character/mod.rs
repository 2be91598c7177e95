//! Character behavior core: state machine, motion step, collider posture.
//!
//! The `Character` component aggregates everything the controller mutates
//! per tick: the current behavior state, the transition edit-lock, the
//! collider shape, the facing sign, and the motion parameters. The state
//! machine (`state`), motion integration (`motion`) and shape helpers
//! (`collider`) operate on it through an exclusive reference; velocity
//! lives in a separate component shared with the physics collaborator.

pub mod collider;
pub mod motion;
pub mod state;

use bevy::prelude::*;

pub use collider::ColliderShape;
pub use motion::{apply_completion_hooks, character_motion, motion_step};
pub use state::{can_enter, State};

use crate::animation::AnimationSink;

/// Per-character controller state.
///
/// Spawned in `PowerUp` with transitions locked; the lock is released by the
/// `powered_up` completion hook once the intro animation reports done.
#[derive(Component)]
pub struct Character {
    pub(crate) state: State,
    pub(crate) transitions_locked: bool,
    /// Collision volume descriptor, reshaped on flight entry/exit.
    pub collider: ColliderShape,
    /// Facing sign applied to the sprite's horizontal scale (+1 right, -1 left).
    pub facing: f32,
    /// Horizontal speed applied per unit of axis input.
    pub movement_speed: f32,
    /// Instantaneous vertical launch speed for a jump.
    pub jump_power: f32,
}

impl Character {
    /// Create a character in its attach-time configuration: one forced
    /// transition request into `PowerUp` (a self-transition, so the sink
    /// stays silent), then the edit-lock engages until `powered_up` fires.
    pub fn new(
        movement_speed: f32,
        jump_power: f32,
        collider: ColliderShape,
        sink: &mut dyn AnimationSink,
    ) -> Self {
        let mut character = Self {
            state: State::PowerUp,
            transitions_locked: false,
            collider,
            facing: 1.0,
            movement_speed,
            jump_power,
        };
        character.request_transition(State::PowerUp, sink);
        character.transitions_locked = true;
        character
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn transitions_locked(&self) -> bool {
        self.transitions_locked
    }
}
