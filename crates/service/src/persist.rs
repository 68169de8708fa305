// ABOUTME: Snapshot persistence: a screenshot plus a pretty JSON payload per lookup, under a dated folder.
// ABOUTME: Failures are logged and swallowed; persistence never fails a lookup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::driver::BrowserDriver;
use crate::error::ServiceError;

const UNSAFE_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Replaces characters that are unsafe in file names with `-`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// `<data_folder>/<YYYY-MM-DD>/<jurisdiction>`, created if missing.
pub fn output_folder(data_folder: &Path, jurisdiction: &str) -> Result<PathBuf, ServiceError> {
    let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let folder = data_folder.join(date).join(jurisdiction);
    fs::create_dir_all(&folder).map_err(|e| {
        ServiceError::persist("CreateDir", folder.display().to_string(), Some(e.into()))
    })?;
    Ok(folder)
}

/// Writes `data` as pretty JSON; an error object is written in its place
/// when serialization fails.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), ServiceError> {
    let body = match serde_json::to_string_pretty(data) {
        Ok(body) => body,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to serialize snapshot");
            let fallback = json!({
                "error": "Failed to serialize data",
                "details": err.to_string(),
            });
            serde_json::to_string_pretty(&fallback)
                .map_err(|e| ServiceError::persist("Serialize", path.display().to_string(), Some(e.into())))?
        }
    };
    fs::write(path, body)
        .map_err(|e| ServiceError::persist("WriteJson", path.display().to_string(), Some(e.into())))
}

/// Saves `<stem>.jpg` and `<stem>.json` for one lookup.
///
/// Returns the JSON path when it was written.
pub fn persist_snapshot<T: Serialize + ?Sized>(
    driver: &dyn BrowserDriver,
    data_folder: &Path,
    jurisdiction: &str,
    stem: &str,
    data: &T,
    full_page: bool,
) -> Option<PathBuf> {
    let folder = match output_folder(data_folder, jurisdiction) {
        Ok(folder) => folder,
        Err(err) => {
            warn!(error = %err, "snapshot folder unavailable");
            return None;
        }
    };
    let stem = sanitize_filename(stem);

    let image = folder.join(format!("{}.jpg", stem));
    if let Err(err) = driver.screenshot(&image, full_page) {
        warn!(error = %err, "screenshot not saved");
    }

    let json_path = folder.join(format!("{}.json", stem));
    match save_json(&json_path, data) {
        Ok(()) => {
            debug!(path = %json_path.display(), "snapshot saved");
            Some(json_path)
        }
        Err(err) => {
            warn!(error = %err, "snapshot json not saved");
            None
        }
    }
}
