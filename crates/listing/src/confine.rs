//! Root confinement for untrusted request paths.
//!
//! A requested path is joined onto the root, normalized lexically, checked
//! against the root on a component boundary, and only then resolved on disk.
//! The resolved (symlink-free) path is checked against the root a second time
//! so a link that points outside the tree is treated like a `..` escape.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{AccessError, Result};

/// The directory nothing may escape from.
///
/// Always canonical: symlinks resolved, absolute, and a directory at the time
/// it was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    path: PathBuf,
}

impl Root {
    /// Canonicalize `path` and verify that it is a directory.
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = fs::canonicalize(path.as_ref())?;
        if !fs::metadata(&path)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("root is not a directory: {}", path.display()),
            ));
        }
        Ok(Self { path })
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// What a confined path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A directory that can be listed.
    Directory,
    /// A regular file that can be delivered.
    File,
}

/// A path proven to lie inside a [`Root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfinedPath {
    absolute: PathBuf,
    relative: String,
    kind: PathKind,
}

impl ConfinedPath {
    /// Canonical absolute path on disk.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the root, `/`-separated, empty for the root itself.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    /// Whether this is the root directory.
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    /// The root-relative path of the parent directory, or `None` at the root.
    pub fn parent_relative(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        Some(
            self.relative
                .rsplit_once('/')
                .map(|(parent, _)| parent)
                .unwrap_or(""),
        )
    }
}

/// Collapse `.` and `..` without touching the filesystem.
///
/// `..` never climbs above a leading root directory, matching how the kernel
/// treats `/..`.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Join `requested` onto the root and check containment without I/O.
///
/// `Path::starts_with` compares whole components, so `/srv/dataEVIL` is not
/// accepted for a root of `/srv/data`.
pub fn lexical_candidate(root: &Root, requested: &str) -> Result<PathBuf> {
    let candidate = normalize_lexical(&root.path.join(requested));
    if candidate.starts_with(&root.path) {
        Ok(candidate)
    } else {
        Err(AccessError::PathEscape)
    }
}

/// Confine `requested` to `root` and resolve it on disk.
pub fn confine(root: &Root, requested: &str) -> Result<ConfinedPath> {
    let candidate = lexical_candidate(root, requested)?;
    resolve(root, &candidate)
}

/// Confine `requested` and require a directory.
pub fn confine_directory(root: &Root, requested: &str) -> Result<ConfinedPath> {
    let confined = confine(root, requested)?;
    if confined.kind != PathKind::Directory {
        return Err(AccessError::NotFound);
    }
    Ok(confined)
}

/// Confine `requested` and require a regular file.
pub fn confine_file(root: &Root, requested: &str) -> Result<ConfinedPath> {
    let confined = confine(root, requested)?;
    if confined.kind != PathKind::File {
        return Err(AccessError::NotFound);
    }
    Ok(confined)
}

/// Resolve a lexically confined candidate through the filesystem.
pub(crate) fn resolve(root: &Root, candidate: &Path) -> Result<ConfinedPath> {
    let canonical = fs::canonicalize(candidate).map_err(AccessError::from_lookup)?;

    let relative = match canonical.strip_prefix(&root.path) {
        Ok(relative) => to_slash(relative)?,
        Err(_) => {
            tracing::warn!("Rejected request resolving outside the root through a symlink");
            return Err(AccessError::PathEscape);
        }
    };

    let metadata = fs::metadata(&canonical).map_err(AccessError::from_lookup)?;
    let kind = if metadata.is_dir() {
        PathKind::Directory
    } else if metadata.is_file() {
        PathKind::File
    } else {
        return Err(AccessError::NotFound);
    };

    Ok(ConfinedPath {
        absolute: canonical,
        relative,
        kind,
    })
}

/// Whether `path` (after symlink resolution) stays inside the root.
pub(crate) fn resolves_inside(root: &Root, path: &Path) -> bool {
    fs::canonicalize(path)
        .map(|canonical| canonical.starts_with(&root.path))
        .unwrap_or(false)
}

/// Render a root-relative path with `/` separators.
///
/// Non-UTF-8 names cannot be addressed by a URL, so they are reported as
/// missing.
fn to_slash(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or(AccessError::NotFound)?),
            _ => return Err(AccessError::PathEscape),
        }
    }
    Ok(parts.join("/"))
}
