//! Extension allow-list for folder uploads.

use std::path::Path;

/// Case-insensitive set of allowed file suffixes, stored as `.ext` in lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: Vec<String>,
}

impl ExtensionFilter {
    /// Normalizes each entry to lowercase with a leading `.`; `"CSV"` and
    /// `".csv"` both become `".csv"`. Duplicates and blank entries are dropped.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            let normalized = format!(".{ext}");
            if !allowed.contains(&normalized) {
                allowed.push(normalized);
            }
        }
        Self { allowed }
    }

    /// `None` or an empty list means every file is allowed. A non-empty list
    /// always yields a filter, even when every entry is blank; such a filter
    /// matches nothing.
    pub fn from_option<S: AsRef<str>>(extensions: Option<&[S]>) -> Option<Self> {
        match extensions {
            Some(list) if !list.is_empty() => Some(Self::new(list.iter())),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn extensions(&self) -> &[String] {
        &self.allowed
    }

    /// True when the final suffix of `path`, lowercased, is allowed.
    /// Names without a suffix (including dotfiles like `.env`) never match.
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let suffix = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.allowed.iter().any(|a| *a == suffix)
            }
            None => false,
        }
    }
}
