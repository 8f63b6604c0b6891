use std::path::PathBuf;
use std::{fs, io};

use crate::data_path;

const CURRENT_LOG: &str = "kandleboard-current.log";
const PREVIOUS_LOG: &str = "kandleboard-previous.log";

/// Opens a fresh log file, keeping the last run's log as the previous one.
pub fn file() -> Result<fs::File, Error> {
    let path = path()?;

    if path.exists() {
        fs::rename(&path, previous_path()?)?;
    }

    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

pub fn path() -> Result<PathBuf, Error> {
    in_data_dir(CURRENT_LOG)
}

pub fn previous_path() -> Result<PathBuf, Error> {
    in_data_dir(PREVIOUS_LOG)
}

fn in_data_dir(file_name: &str) -> Result<PathBuf, Error> {
    let full_path = data_path(Some(file_name));

    let parent = full_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    Ok(full_path)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}
