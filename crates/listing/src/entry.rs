//! Listing rows and the links they carry.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::icon::IconClass;

/// Kind of listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The synthetic row that navigates one level up.
    ParentDirectory,
    /// A subdirectory.
    Directory,
    /// A regular file.
    File,
}

/// A single row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Row kind.
    pub kind: EntryKind,
    /// Display name (file name, or the translated parent label).
    pub name: String,
    /// Navigation link, already percent-encoded.
    pub link: String,
    /// Icon classification.
    pub icon: IconClass,
    /// Human-readable size, files only.
    pub size: Option<String>,
    /// Modification time as `YYYY-MM-DDTHH:MM:SS+00:00`, files only.
    pub modified: Option<String>,
}

/// Link to the listing page of a root-relative directory.
///
/// The root itself links to `/{lang}` with no query.
pub fn directory_link(lang: &str, relative: &str) -> String {
    if relative.is_empty() {
        format!("/{}", lang)
    } else {
        format!("/{}?dir={}", lang, urlencoding::encode(relative))
    }
}

/// Link that downloads a root-relative file.
///
/// Each segment is encoded on its own so `/` keeps separating them.
pub fn file_link(relative: &str) -> String {
    let encoded: Vec<_> = relative
        .split('/')
        .map(|segment| urlencoding::encode(segment))
        .collect();
    format!("/{}", encoded.join("/"))
}

/// Render a modification time as an ISO-8601 UTC timestamp.
pub fn format_modified(modified: SystemTime) -> String {
    let datetime: DateTime<Utc> = modified.into();
    datetime.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}
