//! General utility functions for file paths and JSON persistence.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Name of the application data folder under the user's home directory
const APP_FOLDER: &str = ".chart_engine";

/// Application data directory, created on first use
pub static CHART_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = home.join(APP_FOLDER);
    let _ = fs::create_dir_all(&path);
    path
});

/// Get the full path for a file inside the data directory
pub fn get_file_path(filename: &str) -> PathBuf {
    CHART_DIR.join(filename)
}

/// Get (and create if needed) a sub-folder of the data directory
pub fn get_folder_path(folder_name: &str) -> PathBuf {
    let path = CHART_DIR.join(folder_name);
    let _ = fs::create_dir_all(&path);
    path
}

/// Load data from a JSON file, returning None when the file is missing
/// or cannot be parsed.
pub fn load_json<T: DeserializeOwned>(filepath: &PathBuf) -> Option<T> {
    let content = fs::read_to_string(filepath).ok()?;
    serde_json::from_str(&content).ok()
}

/// Save data into a JSON file with pretty formatting
pub fn save_json<T: Serialize>(filepath: &PathBuf, data: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    if let Some(parent) = filepath.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(filepath, json)
}

/// Round a value to the nearest multiple of target
pub fn round_to(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return value;
    }
    (value / target).round() * target
}

/// Get the number of decimal digits of a value
pub fn get_digits(value: f64) -> usize {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, frac)) => frac.len(),
        None => 0,
    }
}
