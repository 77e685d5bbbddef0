//! Config directory discovery.

use std::path::PathBuf;

/// Application directory name under the platform config dir.
const APP_NAME: &str = "flowinvoke";

/// Environment variable that overrides the config directory.
///
/// When set, this takes precedence over the platform default (XDG/Application Support).
const CONFIG_DIR_ENV: &str = "FLOWINVOKE_CONFIG_DIR";

/// Get the config directory for flowinvoke.
///
/// Checks `FLOWINVOKE_CONFIG_DIR` env var first, then falls back to platform default
/// (`~/.config/flowinvoke` on Linux, `~/Library/Application Support/flowinvoke` on macOS).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
