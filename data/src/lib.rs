pub mod chart;
pub mod config;
pub mod log;
pub mod lookup;
pub mod stats;
pub mod util;

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

pub use chart::{ChartConfig, Scene, Viewport};
pub use config::state::State;
pub use config::timezone::UserTimezone;
pub use lookup::{LookupError, LookupForm, LookupRequest};

use ::log::{info, warn};

pub const SAVED_STATE_PATH: &str = "saved-state.json";

const APP_DIR: &str = "kandleboard";

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub fn write_json_to_file(json: &str, file_name: &str) -> std::io::Result<()> {
    let path = data_path(Some(file_name));

    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid state file path")
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

pub fn read_from_file(file_name: &str) -> Result<State, InternalError> {
    let path = data_path(Some(file_name));

    let mut contents = String::new();
    File::open(&path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|e| InternalError::Config(format!("Failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&contents).map_err(|e| {
        let backup_path = data_path(Some(&backup_name(file_name)));

        if let Err(rename_err) = std::fs::rename(&path, &backup_path) {
            warn!(
                "Failed to backup corrupted state file '{}' to '{}': {}",
                path.display(),
                backup_path.display(),
                rename_err
            );
        } else {
            info!(
                "Backed up corrupted state file to '{}'. It can be restored manually.",
                backup_path.display()
            );
        }

        InternalError::Config(format!("Failed to parse {}: {e}", path.display()))
    })
}

fn backup_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) => format!("{}_old{}", &file_name[..pos], &file_name[pos..]),
        None => format!("{file_name}_old"),
    }
}

/// Application data directory, or a file inside it.
///
/// `KANDLEBOARD_DATA_PATH` replaces the platform data directory.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = match std::env::var("KANDLEBOARD_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR),
    };

    match path_name {
        Some(path_name) => base.join(path_name),
        None => base,
    }
}
