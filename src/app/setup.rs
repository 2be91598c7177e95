//! Scene setup: camera, level geometry and the character entity.
use bevy::prelude::*;

use skybrawl::animation::{
    BufferedSink, SpriteAnimation, StateEntered, TrackLatches, TrackPulse, SHEET_COLS, SHEET_ROWS,
    TILE_SIZE,
};
use skybrawl::character::{Character, ColliderShape, State};
use skybrawl::physics::{Ground, GroundContact, Velocity};
use skybrawl::settings::Settings;

const GROUND_HALF_EXTENTS: Vec2 = Vec2::new(14.0, 0.5);
const GROUND_Y: f32 = -4.0;

/// Spawn the camera, a ground strip and the playable character.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    settings: Res<Settings>,
    mut entered_events: EventWriter<StateEntered>,
    mut pulse_events: EventWriter<TrackPulse>,
) {
    let mut camera = Camera2dBundle::default();
    camera.projection.scale = 1.0 / settings.window.pixels_per_unit;
    commands.spawn(camera);

    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::srgb(0.25, 0.45, 0.2),
                custom_size: Some(GROUND_HALF_EXTENTS * 2.0),
                ..default()
            },
            transform: Transform::from_xyz(0.0, GROUND_Y, 0.0),
            ..default()
        },
        Ground {
            half_extents: GROUND_HALF_EXTENTS,
        },
    ));

    let shape = &settings.character;
    // A missing or degenerate collider is a setup error, not something to
    // limp along with per-tick.
    if shape.collider_width <= 0.0 || shape.collider_height <= 0.0 {
        error!(
            "invalid collider size {}x{} in settings; character not spawned",
            shape.collider_width, shape.collider_height
        );
        return;
    }

    let mut sink = BufferedSink::default();
    let character = Character::new(
        shape.movement_speed,
        shape.jump_power,
        ColliderShape::new(shape.collider_width, shape.collider_height),
        &mut sink,
    );
    sink.drain_into(&mut entered_events, &mut pulse_events);

    let layout = layouts.add(TextureAtlasLayout::from_grid(
        UVec2::splat(TILE_SIZE),
        SHEET_COLS,
        SHEET_ROWS,
        None,
        None,
    ));
    let animation = SpriteAnimation::starting_in(State::PowerUp);
    let spawn_y = GROUND_Y + GROUND_HALF_EXTENTS.y + shape.collider_height * 0.5;

    commands.spawn((
        SpriteBundle {
            texture: asset_server.load("character.png"),
            sprite: Sprite {
                custom_size: Some(Vec2::splat(2.2)),
                ..default()
            },
            transform: Transform::from_xyz(0.0, spawn_y, 1.0),
            ..default()
        },
        TextureAtlas {
            layout,
            index: animation.atlas_index(),
        },
        character,
        animation,
        TrackLatches::default(),
        Velocity::default(),
        GroundContact(true),
    ));
}
