//! Keyboard sampling for the motion controller.
//!
//! The controller consumes normalized axis/button values, not key codes;
//! this module is the collaborator that produces them. Keys come from the
//! keybind table in settings, with hardcoded fallbacks when an entry is
//! missing or unparsable.

use bevy::prelude::*;

use crate::animation::{BufferedSink, StateEntered, TrackPulse};
use crate::character::Character;
use crate::settings::Settings;

/// One fixed tick's worth of sampled input.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    /// Horizontal axis in [-1, 1].
    pub horizontal: f32,
    /// Vertical axis in [-1, 1]; only the positive half triggers a jump.
    pub vertical: f32,
    /// Attack button, level-sampled.
    pub attack: bool,
}

/// Resolve a named keybind from settings, falling back to `default`.
#[must_use]
pub fn resolve_key(settings: &Settings, name: &str, default: KeyCode) -> KeyCode {
    settings
        .controls
        .keybinds
        .get(name)
        .and_then(|s| Settings::keycode_from_str(s))
        .unwrap_or(default)
}

/// Sample the digital keyboard into the axis/button values the motion step
/// consumes. Opposing direction keys cancel out.
#[must_use]
pub fn sample_input(keyboard_input: &ButtonInput<KeyCode>, settings: &Settings) -> TickInput {
    let left = resolve_key(settings, "left", KeyCode::KeyA);
    let right = resolve_key(settings, "right", KeyCode::KeyD);
    let jump = resolve_key(settings, "jump", KeyCode::Space);
    let attack = resolve_key(settings, "attack", KeyCode::KeyJ);

    let mut horizontal = 0.0;
    if keyboard_input.pressed(left) {
        horizontal -= 1.0;
    }
    if keyboard_input.pressed(right) {
        horizontal += 1.0;
    }

    let vertical = if keyboard_input.pressed(jump) { 1.0 } else { 0.0 };

    TickInput {
        horizontal,
        vertical,
        attack: keyboard_input.pressed(attack),
    }
}

/// Edge-triggered block stance keys. Kept out of the motion step so the
/// per-tick sequence stays exactly the controller contract.
#[allow(clippy::needless_pass_by_value)]
pub fn block_stance_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut entered_events: EventWriter<StateEntered>,
    mut pulse_events: EventWriter<TrackPulse>,
    mut query: Query<&mut Character>,
) {
    let block = resolve_key(&settings, "block", KeyCode::KeyK);
    let dismiss = resolve_key(&settings, "dismiss_block", KeyCode::KeyL);

    let Ok(mut character) = query.get_single_mut() else {
        return;
    };

    let mut sink = BufferedSink::default();
    if keyboard_input.just_pressed(block) {
        character.begin_block(&mut sink);
    }
    if keyboard_input.just_pressed(dismiss) {
        character.dismiss_block(&mut sink);
    }
    sink.drain_into(&mut entered_events, &mut pulse_events);
}
