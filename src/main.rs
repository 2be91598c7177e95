use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use skybrawl::animation::{
    advance_sprite_frames, apply_state_events, sync_facing, AnimationFinished, StateEntered,
    TrackPulse,
};
use skybrawl::character::{apply_completion_hooks, character_motion};
use skybrawl::debug::DebugDumpPlugin;
use skybrawl::input::block_stance_input;
use skybrawl::physics::{ground_contact_probe, integrate_motion};
use skybrawl::settings::loader as settings_loader;
use skybrawl::ui::{
    render_collider_outline, setup_debug_overlay, spawn_debug_overlay, toggle_collider_outline,
    toggle_debug_overlay, update_debug_overlay,
};

mod app;
use app::{setup, sync_character_settings, sync_vsync_settings, sync_window_title};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: settings.window.title.clone(),
                    position: WindowPosition::Centered(MonitorSelection::Primary),
                    present_mode: PresentMode::AutoNoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    .add_plugins(FrameTimeDiagnosticsPlugin)
    .add_plugins(DebugDumpPlugin);

    app.add_event::<StateEntered>();
    app.add_event::<TrackPulse>();
    app.add_event::<AnimationFinished>();

    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, setup_debug_overlay);
    app.add_systems(Startup, spawn_debug_overlay);
    app.add_systems(Startup, setup);

    // The fixed step is the controller's tick: contact probe first so the
    // motion step sees this tick's flight status, integration last.
    app.add_systems(
        FixedUpdate,
        (ground_contact_probe, character_motion, integrate_motion).chain(),
    );

    app.add_systems(Update, block_stance_input);
    app.add_systems(Update, apply_state_events);
    app.add_systems(Update, advance_sprite_frames.after(apply_state_events));
    app.add_systems(Update, apply_completion_hooks.after(advance_sprite_frames));
    app.add_systems(Update, sync_facing);
    app.add_systems(Update, toggle_debug_overlay);
    app.add_systems(Update, toggle_collider_outline);
    app.add_systems(Update, update_debug_overlay);
    app.add_systems(Update, render_collider_outline);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, sync_vsync_settings);
    app.add_systems(Update, sync_window_title);
    app.add_systems(Update, sync_character_settings);

    app.run();
}
