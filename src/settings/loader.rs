//! Settings loading and hot-reloading.
//!
//! Settings live as RON files in [`SETTINGS_DIR`]. The first file that
//! parses wins; when none does, defaults are used. A directory watcher
//! raises a flag on edits so the resource can be reloaded mid-session.
use bevy::prelude::{info, warn, Res, ResMut, Resource};
use std::sync::PoisonError;

use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

/// Load settings from `path`, falling back to `Settings::defaults` when no
/// file in the directory parses.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    load_ron_files(path)
        .into_iter()
        .next()
        .unwrap_or_else(Settings::defaults)
}

/// Create a watcher over the settings directory (hot-reload).
///
/// # Errors
/// Returns a `notify::Error` when the OS watcher cannot be created;
/// callers fall back to `SettingsWatcher::stub()`.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Reload the settings resource when the watcher flags a change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    let mut flag = watcher
        .0
        .changed
        .lock()
        .unwrap_or_else(|poisoned| {
            warn!("settings watcher mutex poisoned, recovering");
            PoisonError::into_inner(poisoned)
        });
    if *flag {
        info!("settings changed, reloading from {}", SETTINGS_DIR);
        *settings = load_settings_from_dir(SETTINGS_DIR);
        *flag = false;
    }
}
