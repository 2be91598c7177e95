//! Per-tick motion integration.
//!
//! `motion_step` is the core of the controller: it turns one tick's worth of
//! input axes and ground contact into velocity writes, facing updates and
//! state transition requests. The Bevy system `character_motion` wraps it;
//! the step itself is engine-free so the tick sequence can be unit tested
//! headless. Velocity writes happen regardless of whether the matching
//! state request is accepted, so the physical motion and the labeled state
//! may desynchronize while the edit-lock is held.

use bevy::math::Vec2;
use bevy::prelude::*;

use crate::animation::{
    AnimationFinished, AnimationSink, BufferedSink, StateEntered, TrackPulse,
};
use crate::character::{Character, State};
use crate::input::{sample_input, TickInput};
use crate::physics::{GroundContact, Velocity};
use crate::settings::Settings;

/// Advance the character by one fixed physics step.
///
/// Inert while the power-up intro is still playing. Otherwise the sequence
/// is: sample flight from ground contact, apply horizontal motion, apply the
/// jump impulse, request the flight state, latch an attack, and fall back to
/// standing when nothing else claimed the tick.
pub fn motion_step(
    character: &mut Character,
    velocity: &mut Vec2,
    input: &TickInput,
    on_ground: bool,
    sink: &mut dyn AnimationSink,
) {
    if character.state() == State::PowerUp {
        return;
    }

    let mut flying = !on_ground;

    if input.horizontal != 0.0 {
        velocity.x = input.horizontal * character.movement_speed;
        if !flying {
            character.request_transition(State::Move, sink);
        }
        character.face_toward(input.horizontal);
    }

    if input.vertical > 0.0 && !flying {
        velocity.y = character.jump_power;
        flying = true;
    }

    if flying {
        character.request_transition(State::Fly, sink);
    }

    if input.attack && !character.transitions_locked() {
        character.request_transition(State::Attack, sink);
        character.transitions_locked = true;
    }

    if !flying && input.horizontal == 0.0 && !input.attack {
        velocity.x = 0.0;
        character.request_transition(State::Stand, sink);
    }
}

impl Character {
    /// Completion hook for the one-shot attack animation: release the
    /// edit-lock and drop back to standing.
    pub fn attack_finished(&mut self, sink: &mut dyn AnimationSink) {
        self.transitions_locked = false;
        self.request_transition(State::Stand, sink);
    }

    /// Completion hook for the power-up intro: release the edit-lock the
    /// character spawned with and drop into standing.
    pub fn powered_up(&mut self, sink: &mut dyn AnimationSink) {
        self.transitions_locked = false;
        self.request_transition(State::Stand, sink);
    }
}

/// Fixed-step system driving `motion_step` from sampled input and the
/// ground probe result.
#[allow(clippy::needless_pass_by_value)]
pub fn character_motion(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut entered_events: EventWriter<StateEntered>,
    mut pulse_events: EventWriter<TrackPulse>,
    mut query: Query<(&mut Character, &mut Velocity, &GroundContact)>,
) {
    let input = sample_input(&keyboard_input, &settings);
    let mut sink = BufferedSink::default();

    for (mut character, mut velocity, contact) in &mut query {
        motion_step(&mut character, &mut velocity.0, &input, contact.0, &mut sink);
    }

    sink.drain_into(&mut entered_events, &mut pulse_events);
}

/// Relay one-shot animation completion into the matching character hook.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_completion_hooks(
    mut finished_events: EventReader<AnimationFinished>,
    mut entered_events: EventWriter<StateEntered>,
    mut pulse_events: EventWriter<TrackPulse>,
    mut query: Query<&mut Character>,
) {
    let Ok(mut character) = query.get_single_mut() else {
        return;
    };

    let mut sink = BufferedSink::default();
    for finished in finished_events.read() {
        match State::from_code(finished.0) {
            Some(State::Attack) => character.attack_finished(&mut sink),
            Some(State::PowerUp) => character.powered_up(&mut sink),
            _ => {}
        }
    }
    sink.drain_into(&mut entered_events, &mut pulse_events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::BufferedSink;
    use crate::character::ColliderShape;

    const SPEED: f32 = 20.0;
    const JUMP: f32 = 12.0;

    fn spawned() -> (Character, Vec2) {
        let mut sink = BufferedSink::default();
        let ch = Character::new(SPEED, JUMP, ColliderShape::new(0.9, 1.8), &mut sink);
        (ch, Vec2::ZERO)
    }

    fn idle() -> TickInput {
        TickInput {
            horizontal: 0.0,
            vertical: 0.0,
            attack: false,
        }
    }

    #[test]
    fn inert_until_powered_up() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();

        let input = TickInput {
            horizontal: 1.0,
            vertical: 1.0,
            attack: true,
        };
        motion_step(&mut ch, &mut vel, &input, true, &mut sink);
        assert_eq!(ch.state(), State::PowerUp);
        assert_eq!(vel, Vec2::ZERO);
        assert!(sink.entered.is_empty());
    }

    #[test]
    fn powered_up_then_walk() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();

        ch.powered_up(&mut sink);
        assert!(!ch.transitions_locked());
        assert_eq!(ch.state(), State::Stand);

        let input = TickInput {
            horizontal: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &input, true, &mut sink);
        assert_eq!(ch.state(), State::Move);
        assert_eq!(ch.facing, 1.0);
        assert_eq!(vel.x, SPEED);
    }

    #[test]
    fn facing_flips_with_direction_changes() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);

        let left = TickInput {
            horizontal: -1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &left, true, &mut sink);
        assert_eq!(ch.facing, -1.0);
        assert_eq!(vel.x, -SPEED);

        // Same direction again: no flip.
        motion_step(&mut ch, &mut vel, &left, true, &mut sink);
        assert_eq!(ch.facing, -1.0);

        let right = TickInput {
            horizontal: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &right, true, &mut sink);
        assert_eq!(ch.facing, 1.0);
    }

    #[test]
    fn jump_launches_and_enters_fly_same_tick() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);
        sink.entered.clear();

        let input = TickInput {
            vertical: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &input, true, &mut sink);
        assert_eq!(vel.y, JUMP);
        assert_eq!(ch.state(), State::Fly);
        assert_eq!(ch.collider.height, ch.collider.width);
        assert_eq!(sink.entered.len(), 1);
        assert_eq!(sink.entered[0].0, State::Fly as i32);
    }

    #[test]
    fn jump_is_an_impulse_not_thrust() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);

        let input = TickInput {
            vertical: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &input, true, &mut sink);
        assert_eq!(vel.y, JUMP);

        // Airborne now: holding the jump axis adds nothing.
        vel.y = 3.0;
        motion_step(&mut ch, &mut vel, &input, false, &mut sink);
        assert_eq!(vel.y, 3.0);
    }

    #[test]
    fn airborne_walk_keeps_fly_label() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);

        let input = TickInput {
            horizontal: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &input, false, &mut sink);
        assert_eq!(ch.state(), State::Fly);
        assert_eq!(vel.x, SPEED);
    }

    #[test]
    fn landing_with_no_input_stands_and_stops() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);

        let jump = TickInput {
            vertical: 1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &jump, true, &mut sink);
        assert_eq!(ch.state(), State::Fly);

        vel.x = 4.0;
        vel.y = -2.0;
        motion_step(&mut ch, &mut vel, &idle(), true, &mut sink);
        assert_eq!(ch.state(), State::Stand);
        assert_eq!(vel.x, 0.0);
        // Vertical component is the physics collaborator's to resolve.
        assert_eq!(vel.y, -2.0);
        assert_eq!(ch.collider.height, ch.collider.normal_height());
    }

    #[test]
    fn attack_latches_until_completion_hook() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);
        sink.entered.clear();

        let held = TickInput {
            attack: true,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &held, true, &mut sink);
        assert_eq!(ch.state(), State::Attack);
        assert!(ch.transitions_locked());
        assert_eq!(sink.entered.len(), 1);

        // Button still held across further ticks: no re-entry, no traffic.
        motion_step(&mut ch, &mut vel, &held, true, &mut sink);
        motion_step(&mut ch, &mut vel, &held, true, &mut sink);
        assert_eq!(ch.state(), State::Attack);
        assert_eq!(sink.entered.len(), 1);

        ch.attack_finished(&mut sink);
        assert!(!ch.transitions_locked());
        assert_eq!(ch.state(), State::Stand);
    }

    #[test]
    fn attack_held_suppresses_stand_fallback() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);

        let held = TickInput {
            attack: true,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &held, true, &mut sink);
        vel.x = 5.0;
        motion_step(&mut ch, &mut vel, &held, true, &mut sink);
        // The stand fallback did not fire, so velocity.x stays untouched.
        assert_eq!(vel.x, 5.0);
        assert_eq!(ch.state(), State::Attack);
    }

    #[test]
    fn velocity_applies_even_when_label_is_stuck() {
        let (mut ch, mut vel) = spawned();
        let mut sink = BufferedSink::default();
        ch.powered_up(&mut sink);
        assert!(ch.begin_block(&mut sink));

        let input = TickInput {
            horizontal: -1.0,
            ..idle()
        };
        motion_step(&mut ch, &mut vel, &input, true, &mut sink);
        // Blocked in MakeBlock: the label holds but the body still moves.
        assert_eq!(ch.state(), State::MakeBlock);
        assert_eq!(vel.x, -SPEED);
    }
}
