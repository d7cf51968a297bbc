//! Option records for listing and copying.
//!
//! Options are assembled once (builder for listing, plain struct for copying)
//! and then passed by value/reference through the whole recursive call chain;
//! nothing mutates them mid-walk.

use std::fmt;
use std::str::FromStr;

use super::entry::Timestamp;

/// How to filter files by extension. Directories are never filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtensionFilter {
    #[default]
    None,
    /// Keep only files whose name ends with one of the suffixes.
    Include(Vec<String>),
    /// Drop files whose name ends with one of the suffixes.
    Exclude(Vec<String>),
}

impl ExtensionFilter {
    /// Whether a file named `name` passes the filter.
    ///
    /// Matching is a case-insensitive suffix test, so `"txt"`, `".txt"` and
    /// `"tar.gz"` all work. An empty suffix list disables filtering.
    pub fn accepts(&self, name: &str) -> bool {
        let (suffixes, include) = match self {
            ExtensionFilter::None => return true,
            ExtensionFilter::Include(s) => (s, true),
            ExtensionFilter::Exclude(s) => (s, false),
        };
        if suffixes.is_empty() {
            return true;
        }
        let lower = name.to_lowercase();
        let hit = suffixes
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()));
        hit == include
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Timestamp key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: Timestamp,
    pub order: SortOrder,
}

/// Immutable listing policy. Build with [`ListOptions::builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    recursive: bool,
    exclude_files: bool,
    exclude_dirs: bool,
    exclude_hidden: bool,
    extensions: ExtensionFilter,
    sort: Option<SortSpec>,
}

impl ListOptions {
    pub fn builder() -> ListOptionsBuilder {
        ListOptionsBuilder::default()
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn exclude_files(&self) -> bool {
        self.exclude_files
    }

    pub fn exclude_dirs(&self) -> bool {
        self.exclude_dirs
    }

    pub fn exclude_hidden(&self) -> bool {
        self.exclude_hidden
    }

    pub fn extensions(&self) -> &ExtensionFilter {
        &self.extensions
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOptionsBuilder {
    inner: ListOptions,
}

impl ListOptionsBuilder {
    pub fn recursive(mut self, yes: bool) -> Self {
        self.inner.recursive = yes;
        self
    }

    pub fn exclude_files(mut self, yes: bool) -> Self {
        self.inner.exclude_files = yes;
        self
    }

    pub fn exclude_dirs(mut self, yes: bool) -> Self {
        self.inner.exclude_dirs = yes;
        self
    }

    pub fn exclude_hidden(mut self, yes: bool) -> Self {
        self.inner.exclude_hidden = yes;
        self
    }

    pub fn include_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.extensions = ExtensionFilter::Include(exts.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.extensions = ExtensionFilter::Exclude(exts.into_iter().map(Into::into).collect());
        self
    }

    /// Set the sort key; a later call replaces an earlier one.
    pub fn sort_by(mut self, key: Timestamp, order: SortOrder) -> Self {
        self.inner.sort = Some(SortSpec { key, order });
        self
    }

    pub fn build(self) -> ListOptions {
        self.inner
    }
}

/// What to do when a copy destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail with `AlreadyExists`.
    Fail,
    /// Leave the existing destination untouched and report success.
    Skip,
    /// Overwrite existing file content.
    #[default]
    Replace,
}

impl ConflictPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" | "error" => Some(ConflictPolicy::Fail),
            "skip" => Some(ConflictPolicy::Skip),
            "replace" | "overwrite" => Some(ConflictPolicy::Replace),
            _ => None,
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictPolicy::Fail => "fail",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Replace => "replace",
        })
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid conflict policy: '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Preserve timestamps and permissions on created nodes.
    pub copy_attributes: bool,
    pub on_conflict: ConflictPolicy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            copy_attributes: true,
            on_conflict: ConflictPolicy::Replace,
        }
    }
}

impl CopyOptions {
    pub fn new(copy_attributes: bool, on_conflict: ConflictPolicy) -> Self {
        Self {
            copy_attributes,
            on_conflict,
        }
    }
}
