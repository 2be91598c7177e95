pub mod display;
pub mod setup;

pub use display::{sync_character_settings, sync_vsync_settings, sync_window_title};
pub use setup::setup;
