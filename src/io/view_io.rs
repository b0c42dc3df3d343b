use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::rows_io::{self, RowSourceError};
use crate::state::data_model::RowSet;
use crate::state::table_state::ViewPrefs;
use crate::state::view_config::ViewConfig;

#[derive(Debug, thiserror::Error)]
pub enum ViewIoError {
    #[error(transparent)]
    Rows(#[from] RowSourceError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("view file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_view_config(path: &Path) -> Result<ViewConfig, ViewIoError> {
    let content = fs::read_to_string(path)?;
    let config: ViewConfig = serde_json::from_str(&content)?;
    debug!(path = %path.display(), columns = config.columns.len(), "view config loaded");
    Ok(config)
}

pub fn prefs_path_for_rows(rows_path: &Path) -> PathBuf {
    let mut os: OsString = rows_path.as_os_str().to_os_string();
    os.push(".view");
    PathBuf::from(os)
}

/// `None` when the row file has no preferences saved next to it.
pub fn load_prefs(rows_path: &Path) -> Result<Option<ViewPrefs>, ViewIoError> {
    let path = prefs_path_for_rows(rows_path);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub fn save_prefs(rows_path: &Path, prefs: &ViewPrefs) -> Result<(), ViewIoError> {
    let path = prefs_path_for_rows(rows_path);
    crate::io::write_json_atomic(&path, prefs)?;
    debug!(path = %path.display(), "view preferences saved");
    Ok(())
}

/// Loads a row file with its saved preferences. A broken preferences
/// sidecar is logged and treated as absent rather than failing the load.
pub fn load_rows_and_prefs(rows_path: &Path) -> Result<(RowSet, Option<ViewPrefs>), ViewIoError> {
    let rows = rows_io::load_rows(rows_path)?;
    let prefs = load_prefs(rows_path).unwrap_or_else(|err| {
        warn!(path = %rows_path.display(), %err, "ignoring unreadable view preferences");
        None
    });
    Ok((rows, prefs))
}
