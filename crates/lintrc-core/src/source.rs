//! Labels that tie errors and diagnostics back to the document they came from

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a policy document came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentSource {
    /// A document handed to the compiler directly
    Inline,
    /// A document loaded from disk
    File(PathBuf),
    /// A built-in preset (`lintrc:<name>`)
    Preset(String),
    /// A document registered under a name in an in-memory resolver
    Named(String),
}

impl DocumentSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn preset(name: impl Into<String>) -> Self {
        Self::Preset(name.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("<inline>"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Preset(name) => write!(f, "{}{}", crate::config::PRESET_PREFIX, name),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for DocumentSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Section of a document a setting was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigLocation {
    /// Top-level settings
    Root,
    /// The override block at this index
    Override(usize),
}

impl fmt::Display for ConfigLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("rules"),
            Self::Override(index) => write!(f, "overrides[{index}]"),
        }
    }
}

impl Serialize for ConfigLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
