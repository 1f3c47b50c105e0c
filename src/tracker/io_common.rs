// Primitives shared by the readers and writers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tracker::*;

/// Reads a date in any of the forms of the data files: `2015-01-06`,
/// `2015-01-06T12:00:00` or `2015-01-06T12:00:00-05:00`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|d| d.date())
}

/// Reads a date or time as a local time of the Capitol. A date alone is taken at midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(value) {
        return Some(d.naive_local());
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(d);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes a file through a temporary sibling that is renamed into place, so that readers
/// never see a partial file.
pub fn replace_file<F>(path: &Path, write: F) -> TrackerResult<()>
where
    F: FnOnce(&Path) -> TrackerResult<()>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(WritingFileSnafu {
            path: parent.display().to_string(),
        })?;
    }
    let tmp = temporary_path(path);
    write(&tmp)?;
    fs::rename(&tmp, path).context(WritingFileSnafu {
        path: path.display().to_string(),
    })?;
    debug!("replace_file: wrote {}", path.display());
    Ok(())
}
