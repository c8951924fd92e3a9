//! Directory listings confined to a root.
//!
//! This module turns a confined directory into the ordered rows shown on a
//! listing page: an optional parent row, then visible children sorted by
//! name. Hidden and ignored names never appear, and children whose symlinks
//! lead outside the root are dropped rather than described.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::confine::{self, ConfinedPath, PathKind, Root};
use crate::delivery::{self, Delivery};
use crate::entry::{directory_link, file_link, format_modified, EntryKind, ListEntry};
use crate::error::{AccessError, Result};
use crate::icon::IconClass;
use crate::ignore::IgnoreSet;
use crate::size::format_size;

/// The per-request language data the listing needs.
#[derive(Debug, Clone, Copy)]
pub struct Locale<'a> {
    /// Validated language code, used as the first URL segment.
    pub code: &'a str,
    /// Translated label for the parent row.
    pub parent_label: &'a str,
}

/// Build the listing rows for a confined directory.
///
/// Returns `NotFound` if `dir` is not a directory.
pub fn build_listing(
    dir: &ConfinedPath,
    root: &Root,
    ignore: &IgnoreSet,
    locale: &Locale<'_>,
) -> Result<Vec<ListEntry>> {
    if dir.kind() != PathKind::Directory {
        return Err(AccessError::NotFound);
    }

    let mut entries = Vec::new();

    if let Some(parent) = dir.parent_relative() {
        entries.push(ListEntry {
            kind: EntryKind::ParentDirectory,
            name: locale.parent_label.to_string(),
            link: directory_link(locale.code, parent),
            icon: IconClass::ParentDirectory,
            size: None,
            modified: None,
        });
    }

    for name in visible_names(dir.absolute(), ignore)? {
        let relative = if dir.is_root() {
            name.clone()
        } else {
            format!("{}/{}", dir.relative(), name)
        };
        let path = dir.absolute().join(&name);
        if let Some(entry) = describe_child(root, &path, name, &relative, locale) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

/// Child names that may be shown, sorted and deduplicated.
fn visible_names(dir: &Path, ignore: &IgnoreSet) -> Result<BTreeSet<String>> {
    let read_dir = fs::read_dir(dir).map_err(AccessError::from_lookup)?;

    let mut names = BTreeSet::new();
    for entry_result in read_dir {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!("Skipping non UTF-8 name: {:?}", raw);
                continue;
            }
        };

        if name.starts_with('.') || ignore.contains(&name) {
            continue;
        }
        names.insert(name);
    }
    Ok(names)
}

/// Stat one child and turn it into a row.
///
/// Returns `None` for anything that cannot be shown: vanished entries,
/// special files, and symlinks that resolve outside the root.
fn describe_child(
    root: &Root,
    path: &Path,
    name: String,
    relative: &str,
    locale: &Locale<'_>,
) -> Option<ListEntry> {
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink && !confine::resolves_inside(root, path) {
        debug!(name = %name, "Skipping symlink that leaves the root");
        return None;
    }

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            debug!(name = %name, "Skipping entry that could not be stat'd: {}", e);
            return None;
        }
    };

    if metadata.is_dir() {
        return Some(ListEntry {
            kind: EntryKind::Directory,
            name,
            link: directory_link(locale.code, relative),
            icon: IconClass::Folder,
            size: None,
            modified: None,
        });
    }

    if !metadata.is_file() {
        debug!(name = %name, "Skipping special file");
        return None;
    }

    let mime = mime_guess::from_path(path).first();
    let modified = metadata.modified().ok().map(format_modified);

    Some(ListEntry {
        kind: EntryKind::File,
        icon: IconClass::for_mime(mime.as_ref().map(|m| m.essence_str())),
        link: file_link(relative),
        size: Some(format_size(metadata.len())),
        modified,
        name,
    })
}

/// Directory browser bound to one root and ignore set.
///
/// This is the object a server keeps for its whole lifetime; it holds no
/// mutable state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    root: Root,
    ignore: IgnoreSet,
}

impl DirectoryBrowser {
    /// Create a browser for `root` hiding `ignore`.
    pub fn new(root: Root, ignore: IgnoreSet) -> Self {
        Self { root, ignore }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Confine a requested path that must be a directory.
    pub fn open_directory(&self, requested: &str) -> Result<ConfinedPath> {
        confine::confine_directory(&self.root, requested)
    }

    /// List a confined directory.
    pub fn list(&self, dir: &ConfinedPath, locale: &Locale<'_>) -> Result<Vec<ListEntry>> {
        build_listing(dir, &self.root, &self.ignore, locale)
    }

    /// Confine and list `requested` in one step.
    pub fn list_requested(&self, requested: &str, locale: &Locale<'_>) -> Result<Vec<ListEntry>> {
        let dir = self.open_directory(requested)?;
        self.list(&dir, locale)
    }

    /// Prepare `requested` for delivery.
    pub fn deliver(&self, requested: &str) -> Result<Delivery> {
        delivery::deliver(&self.root, &self.ignore, requested)
    }
}
