use chrono::{DateTime, Local};
use orderbook_core::{FileInfo, Result};
use std::path::Path;

/// Workbook extensions the reader accepts (lower-case, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "xlsb"];

/// Check whether a path has a supported workbook extension (case-insensitive)
#[must_use]
pub fn is_supported_workbook<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Build a [`FileInfo`] from filesystem metadata
///
/// The modification time is expressed in local time.
///
/// # Errors
///
/// Returns `Io` if the file metadata cannot be read.
pub fn file_info<P: AsRef<Path>>(path: P) -> Result<FileInfo> {
    let path = path.as_ref();
    let modified: DateTime<Local> = std::fs::metadata(path)?.modified()?.into();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FileInfo::new(&name, path, modified.naive_local()))
}
