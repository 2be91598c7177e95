pub mod animation;
pub mod character;
pub mod input;
pub mod physics;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod ui;

pub mod debug;
