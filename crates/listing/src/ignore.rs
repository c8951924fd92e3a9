//! Literal names that are never listed or delivered.

use std::collections::HashSet;

/// A set of exact file names to hide and refuse.
///
/// Matching is by whole path segment, case-sensitive, with no globbing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `index.py,.env,languages`.
    ///
    /// Items are trimmed and empty items are dropped.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Whether `name` is ignored.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The first `/`-separated segment of `path` that is ignored.
    pub fn blocked_segment<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.split('/').find(|segment| self.contains(segment))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
