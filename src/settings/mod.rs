//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are
//! hot-reloadable through the directory watcher utilities (see
//! `ron::setup_ron_watcher`). Every field carries a serde default so a
//! partial file still loads.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "WindowSettings::default_title")]
    pub title: String, // Window title.
    #[serde(default = "WindowSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
    #[serde(default = "WindowSettings::default_pixels_per_unit")]
    pub pixels_per_unit: f32, // Camera zoom: screen pixels per world unit.
}

impl WindowSettings {
    fn default_title() -> String { "Skybrawl".to_string() }
    fn default_vsync() -> bool { true }
    fn default_pixels_per_unit() -> f32 { 48.0 }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            vsync: Self::default_vsync(),
            pixels_per_unit: Self::default_pixels_per_unit(),
        }
    }
}

/// Tunables for the playable character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSettings {
    #[serde(default = "CharacterSettings::default_movement_speed")]
    pub movement_speed: f32, // Horizontal speed per unit of axis input.
    #[serde(default = "CharacterSettings::default_jump_power")]
    pub jump_power: f32, // Instantaneous vertical launch speed of a jump.
    #[serde(default = "CharacterSettings::default_collider_width")]
    pub collider_width: f32, // Standing collider width in world units.
    #[serde(default = "CharacterSettings::default_collider_height")]
    pub collider_height: f32, // Standing collider height in world units.
}

impl CharacterSettings {
    fn default_movement_speed() -> f32 { 20.0 }
    fn default_jump_power() -> f32 { 12.0 }
    fn default_collider_width() -> f32 { 0.9 }
    fn default_collider_height() -> f32 { 1.8 }
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            movement_speed: Self::default_movement_speed(),
            jump_power: Self::default_jump_power(),
            collider_width: Self::default_collider_width(),
            collider_height: Self::default_collider_height(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("jump".to_string(), "Space".to_string());
        m.insert("attack".to_string(), "J".to_string());
        m.insert("block".to_string(), "K".to_string());
        m.insert("dismiss_block".to_string(), "L".to_string());
        m.insert("toggle_overlay".to_string(), "F1".to_string());
        m.insert("toggle_collider".to_string(), "F2".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub character: CharacterSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            character: CharacterSettings::default(),
            controls: ControlsSettings::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a
    /// `KeyCode` usable with Bevy's input system. Returns `None` for strings
    /// that match no known key.
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        if s.len() == 1 {
            let c = s.chars().next().unwrap();
            if c.is_ascii_uppercase() {
                return Some(match c {
                    'A' => KeyCode::KeyA,
                    'B' => KeyCode::KeyB,
                    'C' => KeyCode::KeyC,
                    'D' => KeyCode::KeyD,
                    'E' => KeyCode::KeyE,
                    'F' => KeyCode::KeyF,
                    'G' => KeyCode::KeyG,
                    'H' => KeyCode::KeyH,
                    'I' => KeyCode::KeyI,
                    'J' => KeyCode::KeyJ,
                    'K' => KeyCode::KeyK,
                    'L' => KeyCode::KeyL,
                    'M' => KeyCode::KeyM,
                    'N' => KeyCode::KeyN,
                    'O' => KeyCode::KeyO,
                    'P' => KeyCode::KeyP,
                    'Q' => KeyCode::KeyQ,
                    'R' => KeyCode::KeyR,
                    'S' => KeyCode::KeyS,
                    'T' => KeyCode::KeyT,
                    'U' => KeyCode::KeyU,
                    'V' => KeyCode::KeyV,
                    'W' => KeyCode::KeyW,
                    'X' => KeyCode::KeyX,
                    'Y' => KeyCode::KeyY,
                    'Z' => KeyCode::KeyZ,
                    _ => return None,
                });
            }
            if c.is_ascii_digit() {
                return Some(match c {
                    '0' => KeyCode::Digit0,
                    '1' => KeyCode::Digit1,
                    '2' => KeyCode::Digit2,
                    '3' => KeyCode::Digit3,
                    '4' => KeyCode::Digit4,
                    '5' => KeyCode::Digit5,
                    '6' => KeyCode::Digit6,
                    '7' => KeyCode::Digit7,
                    '8' => KeyCode::Digit8,
                    '9' => KeyCode::Digit9,
                    _ => return None,
                });
            }
        }

        Some(match s.as_str() {
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }
}

pub mod loader;
