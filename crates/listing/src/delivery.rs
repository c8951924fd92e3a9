//! File delivery decisions.
//!
//! This module confines a requested file, refuses ignored names, opens the
//! file, and decides how it should be presented:
//! - Viewable types (image, audio, video, text, application) stream inline
//!   with their detected content type
//! - Everything else is a forced download as `application/octet-stream`

use std::fs::File;
use std::path::Path;

use crate::confine::{self, PathKind, Root};
use crate::error::{AccessError, Result};
use crate::ignore::IgnoreSet;

/// Content type used for forced downloads.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Top-level MIME families that are shown inline.
pub const INLINE_FAMILIES: [&str; 5] = ["image", "audio", "video", "text", "application"];

/// How the client should treat the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Display in the browser.
    Inline,
    /// Save to disk.
    Attachment,
}

/// An opened file ready to be streamed.
#[derive(Debug)]
pub struct Delivery {
    file: File,
    len: u64,
    file_name: String,
    content_type: String,
    disposition: Disposition,
}

impl Delivery {
    /// Size in bytes at the time the file was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Name of the requested file, without directories.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// Take the open handle to stream from.
    pub fn into_file(self) -> File {
        self.file
    }
}

/// Decide the content type and disposition for a file name.
pub fn classify(path: &Path) -> (String, Disposition) {
    match mime_guess::from_path(path).first() {
        Some(mime) if INLINE_FAMILIES.contains(&mime.type_().as_str()) => {
            (mime.essence_str().to_string(), Disposition::Inline)
        }
        _ => (OCTET_STREAM.to_string(), Disposition::Attachment),
    }
}

/// Confine, check, and open `requested` for delivery.
///
/// Checks run in order: escape from root (`PathEscape`), ignored segment in
/// the requested path or its resolved form (`Blocked`), then existence and
/// kind (`NotFound`).
pub fn deliver(root: &Root, ignore: &IgnoreSet, requested: &str) -> Result<Delivery> {
    let candidate = confine::lexical_candidate(root, requested)?;

    if let Some(segment) = ignore.blocked_segment(requested) {
        return Err(AccessError::Blocked {
            segment: segment.to_string(),
        });
    }

    let confined = confine::resolve(root, &candidate)?;
    if confined.kind() != PathKind::File {
        return Err(AccessError::NotFound);
    }

    // A symlink can give an ignored file an innocent name.
    if let Some(segment) = ignore.blocked_segment(confined.relative()) {
        return Err(AccessError::Blocked {
            segment: segment.to_string(),
        });
    }

    let file = File::open(confined.absolute()).map_err(AccessError::from_lookup)?;
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(AccessError::NotFound);
    }

    let file_name = candidate
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .to_string();
    let (content_type, disposition) = classify(&candidate);

    Ok(Delivery {
        file,
        len: metadata.len(),
        file_name,
        content_type,
        disposition,
    })
}
