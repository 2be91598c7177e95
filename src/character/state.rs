//! Behavior state machine: state enum, guard table, transition requests.
//!
//! Transition legality is a pure function of `(current, target)` in
//! [`can_enter`], kept separate from the side-effecting request path so the
//! guard table is testable on its own. A request walks a fixed rule order:
//! self-transition and edit-lock rejection first, then the collider posture
//! side effects, then the guard, and only on acceptance the sink
//! notifications.

use crate::animation::AnimationSink;
use crate::character::Character;

/// Behavior states, in animator code order. The discriminant is the integer
/// code handed to the animation sink on every accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum State {
    PowerUp = 0,
    Stand = 1,
    Fly = 2,
    Attack = 3,
    Move = 4,
    MakeBlock = 5,
    DismissBlock = 6,
}

impl State {
    pub const ALL: [State; 7] = [
        State::PowerUp,
        State::Stand,
        State::Fly,
        State::Attack,
        State::Move,
        State::MakeBlock,
        State::DismissBlock,
    ];

    #[must_use]
    pub fn from_code(code: i32) -> Option<State> {
        State::ALL.iter().copied().find(|&s| s as i32 == code)
    }
}

/// Guard table: may the machine move from `current` to `target`?
///
/// Self-transitions and the edit-lock are handled by the request path, not
/// here; this is the per-target legality predicate alone.
#[must_use]
pub fn can_enter(current: State, target: State) -> bool {
    match target {
        State::Stand | State::Fly | State::Attack => current != State::MakeBlock,
        State::Move => matches!(current, State::Fly | State::Stand | State::Attack),
        State::MakeBlock => matches!(current, State::Attack | State::Stand),
        State::DismissBlock => current == State::MakeBlock,
        State::PowerUp => true,
    }
}

/// Crossfade cue triple for an accepted transition: pulse every track except
/// the one being entered. `DismissBlock` fires no pulse at all.
fn pulses(target: State) -> Option<(bool, bool, bool)> {
    match target {
        State::Stand => Some((false, true, true)),
        State::Fly => Some((true, false, true)),
        State::Attack => Some((true, true, false)),
        State::Move | State::MakeBlock | State::PowerUp => Some((true, true, true)),
        State::DismissBlock => None,
    }
}

impl Character {
    /// Attempt to move to `target`. Returns whether the transition applied.
    ///
    /// A rejected request is a silent no-op as far as the sink is concerned,
    /// but the collider posture side effects run before the guard and are
    /// not undone on rejection: leaving `Fly` always restores the standing
    /// posture, and attempting `Fly` always squashes to flight posture.
    pub fn request_transition(&mut self, target: State, sink: &mut dyn AnimationSink) -> bool {
        if self.state == target || self.transitions_locked {
            return false;
        }

        if self.state == State::Fly {
            self.collider.toggle_posture();
        }
        if target == State::Fly {
            self.collider.toggle_posture();
        }

        if !can_enter(self.state, target) {
            return false;
        }

        self.state = target;
        sink.state_entered(target as i32);
        if let Some((standing, flying, attacking)) = pulses(target) {
            sink.pulse(standing, flying, attacking);
        }
        true
    }

    /// Enter the block stance. On success the edit-lock engages so nothing
    /// can interrupt the stance until it is dismissed.
    pub fn begin_block(&mut self, sink: &mut dyn AnimationSink) -> bool {
        if self.request_transition(State::MakeBlock, sink) {
            self.transitions_locked = true;
            true
        } else {
            false
        }
    }

    /// Leave the block stance. Clears the lock the stance holds, then
    /// requests `DismissBlock`; the return to `Stand` happens on the next
    /// motion tick.
    pub fn dismiss_block(&mut self, sink: &mut dyn AnimationSink) -> bool {
        if self.state == State::MakeBlock {
            self.transitions_locked = false;
        }
        self.request_transition(State::DismissBlock, sink)
    }
}
