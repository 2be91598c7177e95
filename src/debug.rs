//! Debug dump utilities: a system (F3 default) that writes a snapshot of
//! the character controller and runtime diagnostics to a timestamped text
//! file in `./debug-dumps/`.
//!
//! Useful for capturing the controller's internal state (behavior state,
//! lock, collider posture, velocity) at a moment of misbehavior without
//! attaching a debugger.
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::character::Character;
use crate::input::resolve_key;
use crate::physics::{GroundContact, Velocity};
use crate::settings::Settings;

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_dump_system);
    }
}

fn kb_to_mb(kb: u64) -> String {
    format!("{:.2} MB", (kb as f64) / 1024.0)
}

/// Listen for the dump key and write the snapshot file.
#[allow(clippy::needless_pass_by_value)]
fn debug_dump_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    query_entities: Query<Entity>,
    character_query: Query<(&Transform, &Character, &Velocity, &GroundContact)>,
) {
    if !keys.just_pressed(resolve_key(&settings, "dump_debug", KeyCode::F3)) {
        return;
    }

    // timestamp & filename
    let now = SystemTime::now();
    let ts_secs = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let dt: DateTime<Utc> = DateTime::from(now);
    let human_ts = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    let dir = "debug-dumps";
    let fname = format!("{}/debug-{}.txt", dir, ts_secs);

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let entity_count = query_entities.iter().count();

    // process / system memory (sysinfo)
    let mut sys = System::new_all();
    sys.refresh_all();
    let pid = std::process::id();
    let proc = sys.process(Pid::from(pid as usize));
    let proc_mem_kb = proc.map(|p| p.memory()).unwrap_or(0);
    let total_mem_kb = sys.total_memory();
    let used_mem_kb = sys.used_memory();

    let mut out = String::new();
    writeln!(out, "Debug dump: {}", ts_secs).ok();
    writeln!(out, "Timestamp: {} (epoch secs: {})", human_ts, ts_secs).ok();
    writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", fps, frame_time * 1000.0).ok();
    writeln!(out, "Entities: {}", entity_count).ok();
    writeln!(out, "Process memory: {}", kb_to_mb(proc_mem_kb)).ok();
    writeln!(
        out,
        "System memory: total={} used={}",
        kb_to_mb(total_mem_kb),
        kb_to_mb(used_mem_kb)
    )
    .ok();

    writeln!(out, "\nCharacter controller:").ok();
    if let Ok((transform, character, velocity, contact)) = character_query.get_single() {
        writeln!(out, "  state: {:?}", character.state()).ok();
        writeln!(out, "  transitions_locked: {}", character.transitions_locked()).ok();
        writeln!(
            out,
            "  collider: {:.3} x {:.3} (normal height {:.3}, flight posture: {})",
            character.collider.width,
            character.collider.height,
            character.collider.normal_height(),
            character.collider.in_flight_posture()
        )
        .ok();
        writeln!(out, "  facing: {:+.0}", character.facing).ok();
        writeln!(
            out,
            "  position: ({:.3}, {:.3})",
            transform.translation.x, transform.translation.y
        )
        .ok();
        writeln!(out, "  velocity: ({:.3}, {:.3})", velocity.0.x, velocity.0.y).ok();
        writeln!(out, "  grounded: {}", contact.0).ok();
    } else {
        writeln!(out, "  (no character spawned)").ok();
    }

    // ensure directory & write
    if let Err(e) = fs::create_dir_all(dir) {
        error!("debug dump: failed to create dir '{}': {}", dir, e);
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {}: {}", fname, e);
    } else {
        info!("wrote debug dump: {}", fname);
    }
}
