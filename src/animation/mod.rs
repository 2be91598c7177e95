//! Animation sink abstraction and sprite-sheet playback.
//!
//! The character core never talks to rendering directly: accepted state
//! transitions are reported through the narrow [`AnimationSink`] interface
//! (one integer state code, up to one pulse triple per transition). The Bevy
//! side of this module turns those notifications into events, maps state
//! codes onto sprite-sheet rows, advances frames, and reports one-shot
//! completion back to the character's completion hooks.

use bevy::prelude::*;

use crate::character::{Character, State};

/// Receiver for state-machine notifications.
///
/// `state_entered` is called exactly once per accepted transition with the
/// integer code of the new state. `pulse` may follow with the crossfade cue
/// triple; some targets fire no pulse at all.
pub trait AnimationSink {
    fn state_entered(&mut self, code: i32);
    fn pulse(&mut self, standing: bool, flying: bool, attacking: bool);
}

/// Sink that discards every notification. Useful for headless use and
/// benchmarks where only the state machine itself is of interest.
pub struct NullSink;

impl AnimationSink for NullSink {
    fn state_entered(&mut self, _code: i32) {}
    fn pulse(&mut self, _standing: bool, _flying: bool, _attacking: bool) {}
}

/// Event fired for every accepted transition, carrying the state code.
#[derive(Event, Clone, Copy, Debug)]
pub struct StateEntered(pub i32);

/// Crossfade cue triple: "pulse every track except the one being entered".
#[derive(Event, Clone, Copy, Debug)]
pub struct TrackPulse {
    pub standing: bool,
    pub flying: bool,
    pub attacking: bool,
}

/// Fired when a one-shot animation row has played its last frame. Carries
/// the state code of the row that finished.
#[derive(Event, Clone, Copy, Debug)]
pub struct AnimationFinished(pub i32);

/// Sink that buffers notifications so a system can drain them into Bevy
/// event writers after the borrow on the character ends. Doubles as the
/// recording sink in unit tests.
#[derive(Default)]
pub struct BufferedSink {
    pub entered: Vec<StateEntered>,
    pub pulses: Vec<TrackPulse>,
}

impl AnimationSink for BufferedSink {
    fn state_entered(&mut self, code: i32) {
        self.entered.push(StateEntered(code));
    }

    fn pulse(&mut self, standing: bool, flying: bool, attacking: bool) {
        self.pulses.push(TrackPulse {
            standing,
            flying,
            attacking,
        });
    }
}

impl BufferedSink {
    /// Forward everything buffered so far and clear the buffers.
    pub fn drain_into(
        &mut self,
        entered: &mut EventWriter<StateEntered>,
        pulses: &mut EventWriter<TrackPulse>,
    ) {
        for e in self.entered.drain(..) {
            entered.send(e);
        }
        for p in self.pulses.drain(..) {
            pulses.send(p);
        }
    }
}

// Sprite sheet layout: one row per state, in state-code order.
pub const SHEET_COLS: u32 = 10;
pub const SHEET_ROWS: u32 = 7;
pub const TILE_SIZE: u32 = 48;

/// Frames used in each row (rows may be shorter than `SHEET_COLS`).
pub const ROW_FRAMES: [usize; 7] = [10, 4, 6, 7, 8, 4, 4];
/// Playback rate per row.
pub const ROW_FPS: [f32; 7] = [10.0, 6.0, 12.0, 14.0, 12.0, 10.0, 10.0];
/// Rows that play once and hold their last frame instead of looping.
/// PowerUp and Attack report completion into the character's hooks;
/// MakeBlock and DismissBlock simply hold their pose.
pub const ROW_ONE_SHOT: [bool; 7] = [true, false, false, true, false, true, true];

/// Per-entity playback cursor over the sprite sheet.
#[derive(Component)]
pub struct SpriteAnimation {
    row: usize,
    frame: usize,
    timer: Timer,
    finished: bool,
    reported: bool,
}

impl SpriteAnimation {
    #[must_use]
    pub fn starting_in(state: State) -> Self {
        let row = state as usize;
        Self {
            row,
            frame: 0,
            timer: Timer::from_seconds(1.0 / ROW_FPS[row], TimerMode::Repeating),
            finished: false,
            reported: false,
        }
    }

    /// Restart playback on the row for `code`. Out-of-range codes are ignored.
    pub fn play(&mut self, code: i32) {
        let Ok(row) = usize::try_from(code) else {
            return;
        };
        if row >= ROW_FRAMES.len() {
            return;
        }
        self.row = row;
        self.frame = 0;
        self.finished = false;
        self.reported = false;
        self.timer = Timer::from_seconds(1.0 / ROW_FPS[row], TimerMode::Repeating);
    }

    #[must_use]
    pub fn atlas_index(&self) -> usize {
        self.row * SHEET_COLS as usize + self.frame
    }

    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Trigger latches set by pulses and consumed when the matching row starts,
/// mirroring an animator's trigger semantics for crossfade cues.
#[derive(Component, Default)]
pub struct TrackLatches {
    pub standing: bool,
    pub flying: bool,
    pub attacking: bool,
}

/// Apply state-entered and pulse events to the playback components.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_state_events(
    mut entered: EventReader<StateEntered>,
    mut pulses: EventReader<TrackPulse>,
    mut query: Query<(&mut SpriteAnimation, &mut TrackLatches)>,
) {
    let Ok((mut anim, mut latches)) = query.get_single_mut() else {
        return;
    };

    for pulse in pulses.read() {
        latches.standing |= pulse.standing;
        latches.flying |= pulse.flying;
        latches.attacking |= pulse.attacking;
    }

    for event in entered.read() {
        anim.play(event.0);
        // Entering a track consumes its latch.
        match State::from_code(event.0) {
            Some(State::Stand) => latches.standing = false,
            Some(State::Fly) => latches.flying = false,
            Some(State::Attack) => latches.attacking = false,
            _ => {}
        }
    }
}

/// Advance frames on a timer and write the atlas index. One-shot rows hold
/// their last frame and report completion exactly once.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_sprite_frames(
    time: Res<Time>,
    mut finished_events: EventWriter<AnimationFinished>,
    mut query: Query<(&mut SpriteAnimation, &mut TextureAtlas)>,
) {
    let Ok((mut anim, mut atlas)) = query.get_single_mut() else {
        return;
    };

    if anim.timer.tick(time.delta()).just_finished() && !anim.finished {
        let frames = ROW_FRAMES[anim.row];
        let last = frames.saturating_sub(1);
        if anim.frame >= last {
            if ROW_ONE_SHOT[anim.row] {
                anim.finished = true;
            } else {
                anim.frame = 0;
            }
        } else {
            anim.frame += 1;
        }
    }

    if anim.finished && !anim.reported {
        anim.reported = true;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        finished_events.send(AnimationFinished(anim.row as i32));
    }

    atlas.index = anim.atlas_index();
}

/// Mirror the character's facing sign onto the sprite.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_facing(mut query: Query<(&Character, &mut Sprite)>) {
    for (character, mut sprite) in &mut query {
        sprite.flip_x = character.facing < 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_sink_records_in_order() {
        let mut sink = BufferedSink::default();
        sink.state_entered(State::Move as i32);
        sink.pulse(true, true, true);
        sink.state_entered(State::Stand as i32);
        assert_eq!(sink.entered.len(), 2);
        assert_eq!(sink.entered[0].0, State::Move as i32);
        assert_eq!(sink.entered[1].0, State::Stand as i32);
        assert_eq!(sink.pulses.len(), 1);
    }

    #[test]
    fn play_resets_cursor_and_ignores_bad_codes() {
        let mut anim = SpriteAnimation::starting_in(State::PowerUp);
        anim.frame = 3;
        anim.play(State::Fly as i32);
        assert_eq!(anim.row(), State::Fly as usize);
        assert_eq!(anim.atlas_index(), State::Fly as usize * SHEET_COLS as usize);

        anim.play(-1);
        assert_eq!(anim.row(), State::Fly as usize);
        anim.play(99);
        assert_eq!(anim.row(), State::Fly as usize);
    }

    #[test]
    fn row_tables_cover_every_state() {
        assert_eq!(ROW_FRAMES.len(), SHEET_ROWS as usize);
        assert_eq!(ROW_FPS.len(), SHEET_ROWS as usize);
        assert_eq!(ROW_ONE_SHOT.len(), SHEET_ROWS as usize);
        assert!(ROW_FRAMES.iter().all(|&f| f > 0 && f <= SHEET_COLS as usize));
    }
}
