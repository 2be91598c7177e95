//! RON file loading and change watching.
//!
//! Small helpers for reading RON files out of a directory and a filesystem
//! watcher resource that raises a shared flag when files under the
//! directory change. Used for hot-reloading the settings file while the
//! game is running.

use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Set to `true` when a watched file changes.
    _watcher: Option<RecommendedWatcher>, // Keeps the OS watcher alive.
}

impl RonWatcher {
    /// A `RonWatcher` with no OS watcher behind it; its flag never raises.
    /// Used as the fallback when watcher creation fails.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }
}

/// Load every parseable `.ron` file in `path` and deserialize into `T`.
/// Files that fail to parse are skipped with a note on stderr.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for entry in entries.flatten() {
        let file = entry.path();
        if file.extension().and_then(|ext| ext.to_str()) != Some("ron") {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => eprintln!("Failed to parse {}: {e:?}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` over `path`, raising its flag on modification
/// events under that directory.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or the
/// path cannot be registered.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let flag = changed.clone();
    // Canonicalize so event paths can be filtered to the watched directory.
    let watched: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched)
                });
                if relevant {
                    match flag.lock() {
                        Ok(mut f) => *f = true,
                        Err(poisoned) => *poisoned.into_inner() = true,
                    }
                }
            }
            Err(e) => eprintln!("Watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher {
        changed,
        _watcher: Some(watcher),
    })
}
