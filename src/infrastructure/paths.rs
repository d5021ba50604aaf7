//! Platform path resolution.
//!
//! Locates the per-user data and configuration directories through the `dirs`
//! crate and expands `~` in user-supplied paths.

use std::path::{Path, PathBuf};

/// File name of the record store inside the data directory.
pub const STORE_FILE_NAME: &str = "fueltracker.json";

/// File name of the span export inside the data directory.
pub const TRACE_FILE_NAME: &str = "fuel-tracker-traces.jsonl";

const APP_DIR: &str = "fuel-tracker";

/// Returns the default data directory.
///
/// This is `fuel-tracker` under the platform's local data directory
/// (`~/.local/share` on Linux), or under the working directory when the
/// platform has none.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns the path of the optional configuration file,
/// `<config_dir>/fuel-tracker/config.toml`.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// # Examples
///
/// ```
/// use fuel_tracker::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/cars"), home.join("cars"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Path of the record store inside `data_dir`.
#[must_use]
pub fn store_file(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}
