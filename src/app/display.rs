//! Display and settings sync systems: window title, vsync and character
//! tunables are pushed from the `Settings` resource so hot-reloaded edits
//! take effect without restarting.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};

use skybrawl::character::Character;
use skybrawl::settings::Settings;

/// Sync `Settings.window.vsync` into the present mode of the primary window.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.window.vsync;
    if *last == Some(desired) {
        return;
    }

    for mut w in windows.iter_mut() {
        w.present_mode = if desired {
            PresentMode::Fifo
        } else {
            PresentMode::AutoNoVsync
        };
    }
    *last = Some(desired);
}

/// Sync `Settings.window.title` into the primary window.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_window_title(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<String>>,
) {
    let desired = &settings.window.title;
    if last.as_ref() == Some(desired) {
        return;
    }

    for mut w in windows.iter_mut() {
        w.title = desired.clone();
    }
    *last = Some(desired.clone());
}

/// Push reloaded movement tunables into the live character. The collider
/// is left alone: resizing it mid-posture would fight the state machine's
/// toggle.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_character_settings(settings: Res<Settings>, mut query: Query<&mut Character>) {
    if !settings.is_changed() {
        return;
    }

    for mut character in &mut query {
        character.movement_speed = settings.character.movement_speed;
        character.jump_power = settings.character.jump_power;
    }
}
