use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec2;
use skybrawl::animation::NullSink;
use skybrawl::character::{can_enter, motion_step, Character, ColliderShape, State};
use skybrawl::input::TickInput;

fn fresh_character() -> Character {
    let mut character = Character::new(20.0, 12.0, ColliderShape::new(0.9, 1.8), &mut NullSink);
    character.powered_up(&mut NullSink);
    character
}

/// Sweep the guard table over every (current, target) pair.
fn bench_guard_table(c: &mut Criterion) {
    c.bench_function("guard_table_sweep", |b| {
        b.iter(|| {
            let mut legal = 0usize;
            for _ in 0..1_000usize {
                for current in State::ALL {
                    for target in State::ALL {
                        if can_enter(black_box(current), black_box(target)) {
                            legal += 1;
                        }
                    }
                }
            }
            black_box(legal);
        })
    });
}

/// Run the motion step with a deterministic LCG input pattern covering
/// walking, jumping, attacking and idle ticks.
fn bench_motion_ticks(c: &mut Criterion) {
    c.bench_function("motion_step_ticks", |b| {
        b.iter(|| {
            let mut character = fresh_character();
            let mut velocity = Vec2::ZERO;
            let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
            for i in 0..1_000usize {
                seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let bits = (seed >> 33) as u32;
                let input = TickInput {
                    horizontal: match bits % 3 {
                        0 => -1.0,
                        1 => 0.0,
                        _ => 1.0,
                    },
                    vertical: if bits & 8 != 0 { 1.0 } else { 0.0 },
                    attack: bits & 16 != 0,
                };
                let on_ground = i % 4 != 3;
                motion_step(
                    &mut character,
                    &mut velocity,
                    black_box(&input),
                    on_ground,
                    &mut NullSink,
                );
                // Periodically release the attack latch the way the
                // completion hook would.
                if i % 32 == 31 {
                    character.attack_finished(&mut NullSink);
                }
            }
            black_box(velocity);
        })
    });
}

/// Hammer the transition request path with a rotating target sequence.
fn bench_transition_storm(c: &mut Criterion) {
    c.bench_function("transition_request_storm", |b| {
        b.iter(|| {
            let mut character = fresh_character();
            let mut accepted = 0usize;
            for i in 0..1_000usize {
                let target = State::ALL[i % State::ALL.len()];
                if character.request_transition(black_box(target), &mut NullSink) {
                    accepted += 1;
                }
            }
            black_box(accepted);
        })
    });
}

criterion_group!(
    benches,
    bench_guard_table,
    bench_motion_ticks,
    bench_transition_storm
);
criterion_main!(benches);
