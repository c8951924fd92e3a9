//! Page translations.
//!
//! Every `{xx}.toml` file in the languages directory is one language. They
//! are all read at startup; the resulting [`Translations`] never changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors while loading translations.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read languages directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read translation {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid translation {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("default language '{0}' has no translation file")]
    MissingDefault(String),
}

/// `<head>` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadText {
    /// Text direction, `ltr` or `rtl`.
    pub dir: String,
    pub description: String,
}

/// Table and search box strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BodyText {
    pub search_placeholder: String,
    pub file: String,
    pub name: String,
    pub size: String,
    pub last_modified: String,
}

/// One language's strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub directory_listing: String,

    #[serde(rename = "Parent_Directory")]
    pub parent_directory: String,

    pub head: HeadText,

    pub body: BodyText,
}

/// True for two ASCII letters, in any case.
pub fn is_language_code(candidate: &str) -> bool {
    candidate.len() == 2 && candidate.chars().all(|c| c.is_ascii_alphabetic())
}

/// All loaded languages, keyed by lower-case code.
#[derive(Debug, Clone)]
pub struct Translations {
    languages: BTreeMap<String, Translation>,
    default_code: String,
}

impl Translations {
    /// Load every `{xx}.toml` file in `dir`.
    ///
    /// Files with other names are skipped. Fails if `default_code` is not
    /// among the loaded languages.
    pub fn load_dir(dir: &Path, default_code: &str) -> Result<Self, I18nError> {
        let read_dir = fs::read_dir(dir).map_err(|source| I18nError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut languages = BTreeMap::new();
        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable languages entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let Some(code) = language_code_of(&path) else {
                debug!("Ignoring non-translation file {:?}", path);
                continue;
            };

            let contents = fs::read_to_string(&path).map_err(|source| I18nError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let translation: Translation =
                toml::from_str(&contents).map_err(|e| I18nError::Parse {
                    path: path.clone(),
                    message: e.message().to_string(),
                })?;

            debug!(code = %code, "Loaded translation");
            languages.insert(code, translation);
        }

        Self::from_map(languages, default_code)
    }

    /// Build from already parsed translations.
    pub fn from_map(
        languages: BTreeMap<String, Translation>,
        default_code: &str,
    ) -> Result<Self, I18nError> {
        let default_code = default_code.to_ascii_lowercase();
        if !languages.contains_key(&default_code) {
            return Err(I18nError::MissingDefault(default_code));
        }

        info!(
            "Loaded {} language(s): {}",
            languages.len(),
            languages.keys().cloned().collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            languages,
            default_code,
        })
    }

    /// Look up a requested code. Matching is case-insensitive; the returned
    /// code is the canonical lower-case one.
    pub fn resolve(&self, requested: &str) -> Option<(&str, &Translation)> {
        if !is_language_code(requested) {
            return None;
        }
        let code = requested.to_ascii_lowercase();
        self.languages
            .get_key_value(&code)
            .map(|(code, translation)| (code.as_str(), translation))
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.languages.len()
    }
}

/// The lower-cased code if `path` is named `{xx}.toml`.
fn language_code_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("toml") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_language_code(stem).then(|| stem.to_ascii_lowercase())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const EN_TOML: &str = r#"
directory_listing = "Directory Listing"
Parent_Directory = "Parent Directory"

[head]
dir = "ltr"
description = "Browse and download files"

[body]
search_placeholder = "Search files..."
file = "File"
name = "Name"
size = "Size"
last_modified = "Last Modified"
"#;

    pub(crate) const FA_TOML: &str = r#"
directory_listing = "فهرست پوشه"
Parent_Directory = "پوشه بالاتر"

[head]
dir = "rtl"
description = "مرور و دریافت فایل‌ها"

[body]
search_placeholder = "جستجوی فایل..."
file = "فایل"
name = "نام"
size = "اندازه"
last_modified = "آخرین تغییر"
"#;

    pub(crate) fn english() -> Translation {
        toml::from_str(EN_TOML).unwrap()
    }

    fn languages_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.toml"), EN_TOML).unwrap();
        fs::write(temp_dir.path().join("FA.toml"), FA_TOML).unwrap();
        fs::write(temp_dir.path().join("README.md"), "not a language").unwrap();
        fs::write(temp_dir.path().join("eng.toml"), EN_TOML).unwrap();
        temp_dir
    }

    #[test]
    fn test_is_language_code() {
        assert!(is_language_code("en"));
        assert!(is_language_code("FA"));
        assert!(!is_language_code("eng"));
        assert!(!is_language_code("e1"));
        assert!(!is_language_code(""));
        assert!(!is_language_code("a.txt"));
    }

    #[test]
    fn test_parse_translation() {
        let translation = english();
        assert_eq!(translation.directory_listing, "Directory Listing");
        assert_eq!(translation.parent_directory, "Parent Directory");
        assert_eq!(translation.head.dir, "ltr");
        assert_eq!(translation.body.last_modified, "Last Modified");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result: Result<Translation, _> = toml::from_str("directory_listing = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = languages_dir();
        let translations = Translations::load_dir(temp_dir.path(), "en").unwrap();

        assert_eq!(translations.len(), 2);
        assert_eq!(translations.default_code(), "en");
        assert_eq!(translations.resolve("en").unwrap().0, "en");
        assert_eq!(translations.resolve("fa").unwrap().1.head.dir, "rtl");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let temp_dir = languages_dir();
        let translations = Translations::load_dir(temp_dir.path(), "EN").unwrap();

        let (code, translation) = translations.resolve("En").unwrap();
        assert_eq!(code, "en");
        assert_eq!(translation.parent_directory, "Parent Directory");
        assert_eq!(translations.default_code(), "en");
    }

    #[test]
    fn test_resolve_unknown() {
        let temp_dir = languages_dir();
        let translations = Translations::load_dir(temp_dir.path(), "en").unwrap();

        assert!(translations.resolve("de").is_none());
        assert!(translations.resolve("eng").is_none());
        assert!(translations.resolve("a.txt").is_none());
    }

    #[test]
    fn test_missing_default() {
        let temp_dir = languages_dir();
        let result = Translations::load_dir(temp_dir.path(), "de");
        assert!(matches!(result, Err(I18nError::MissingDefault(code)) if code == "de"));
    }

    #[test]
    fn test_missing_dir() {
        let result = Translations::load_dir(Path::new("/nonexistent/languages"), "en");
        assert!(matches!(result, Err(I18nError::ReadDir { .. })));
    }

    #[test]
    fn test_invalid_translation_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.toml"), "directory_listing = [").unwrap();
        let result = Translations::load_dir(temp_dir.path(), "en");
        assert!(matches!(result, Err(I18nError::Parse { .. })));
    }
}
