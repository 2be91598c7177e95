//! Debug overlay and collider visualization.
//!
//! A toggleable text overlay showing the character's behavior state, lock
//! flag, velocity, facing and collider size alongside FPS, refreshed on a
//! half-second timer, plus a gizmo outline of the current collider shape
//! for checking flight posture visually.

use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::animation::TrackLatches;
use crate::character::Character;
use crate::input::resolve_key;
use crate::physics::{GroundContact, Velocity};
use crate::settings::Settings;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Resource, Default)]
pub struct ColliderOutlineVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert debug overlay resources.
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(
        0.5,
        TimerMode::Repeating,
    )));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(ColliderOutlineVisible::default());
}

/// Spawn the (initially empty) overlay text element.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_debug_overlay(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font_handle: Handle<Font> = asset_server.load("fonts/OpenSans.ttf");

    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font: font_handle,
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Toggle the overlay when the mapped key (F1 default) is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(resolve_key(&settings, "toggle_overlay", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

/// Toggle the collider outline when the mapped key (F2 default) is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_collider_outline(
    mut outline: ResMut<ColliderOutlineVisible>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(resolve_key(&settings, "toggle_collider", KeyCode::F2)) {
        outline.0 = !outline.0;
    }
}

/// System parameters for the overlay update, grouped for a readable
/// signature.
#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub state: Res<'w, DebugOverlayState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub character_query: Query<
        'w,
        's,
        (
            &'static Transform,
            &'static Character,
            &'static Velocity,
            &'static GroundContact,
            &'static TrackLatches,
        ),
    >,
}

/// Refresh the overlay text at a fixed interval. Querying diagnostics and
/// formatting every frame is not worth it for a readout that changes
/// twice a second.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else {
        return;
    };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let character_lines = if let Ok((transform, character, velocity, contact, latches)) =
        ctx.character_query.get_single()
    {
        let pos = transform.translation;
        format!(
            "State: {:?}{}\nPos: ({:.2}, {:.2})  Vel: ({:.2}, {:.2})\nFacing: {}  Grounded: {}\nCollider: {:.2} x {:.2}\nCues: standing={} flying={} attacking={}",
            character.state(),
            if character.transitions_locked() { " [locked]" } else { "" },
            pos.x,
            pos.y,
            velocity.0.x,
            velocity.0.y,
            if character.facing < 0.0 { "left" } else { "right" },
            contact.0,
            character.collider.width,
            character.collider.height,
            latches.standing,
            latches.flying,
            latches.attacking,
        )
    } else {
        "State: N/A".to_string()
    };

    text.sections[0].value = format!("FPS: {fps:.1}\n{character_lines}");
}

/// Draw the character's collider as a wireframe rectangle.
#[allow(clippy::needless_pass_by_value)]
pub fn render_collider_outline(
    outline: Res<ColliderOutlineVisible>,
    mut gizmos: Gizmos,
    query: Query<(&Transform, &Character)>,
) {
    if !outline.0 {
        return;
    }

    let green = Color::srgb(0.0, 1.0, 0.0);
    for (transform, character) in &query {
        gizmos.rect_2d(
            transform.translation.truncate(),
            0.0,
            character.collider.size(),
            green,
        );
    }
}
