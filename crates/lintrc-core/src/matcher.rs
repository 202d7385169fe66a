//! Path matching for override blocks and ignore patterns
//!
//! Patterns are matched against paths relative to the document root with `/`
//! separators. `*` and `?` never cross a `/`, `**` does. Matching is
//! case-sensitive.
//!
//! The extglob groups `?(a|b)` (zero or one of) and `@(a|b)` (exactly one of)
//! are expanded into plain globs. `*(..)`, `+(..)` and `!(..)` cannot be
//! expressed that way and are rejected.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use thiserror::Error;

/// A pattern that could not be compiled
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

/// Compiled `files` / `excludedFiles` selectors of one block
#[derive(Debug, Clone)]
pub struct FileSelector {
    patterns: Vec<String>,
    include: GlobSet,
    exclude: GlobSet,
}

impl FileSelector {
    /// Compile a selector
    ///
    /// `!`-prefixed entries in `files` and every `excluded` entry are negations.
    /// At least one positive pattern is required.
    pub fn new(files: &[String], excluded: &[String]) -> Result<Self, PatternError> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut positives = 0usize;

        for pattern in files {
            match pattern.strip_prefix('!') {
                Some(negated) => add_all(&mut exclude, pattern, negated)?,
                None => {
                    positives += 1;
                    add_all(&mut include, pattern, pattern)?;
                }
            }
        }
        for pattern in excluded {
            add_all(&mut exclude, pattern, pattern)?;
        }

        if positives == 0 {
            return Err(PatternError {
                pattern: files.join(", "),
                reason: "at least one non-negated pattern is required".to_string(),
            });
        }

        Ok(Self {
            patterns: files.iter().chain(excluded).cloned().collect(),
            include: include.build().map_err(|err| set_error(files, err))?,
            exclude: exclude.build().map_err(|err| set_error(excluded, err))?,
        })
    }

    /// Selector matching any of `patterns`, used for `ignorePatterns`
    pub fn any_of(patterns: &[String]) -> Result<Self, PatternError> {
        Self::new(patterns, &[])
    }

    /// Whether a normalized relative path is selected
    pub fn is_match(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    /// Patterns as written, negations included
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn add_all(set: &mut GlobSetBuilder, original: &str, pattern: &str) -> Result<(), PatternError> {
    if pattern.is_empty() {
        return Err(pattern_error(original, "empty pattern"));
    }
    for expanded in expand_extglob(original, pattern)? {
        set.add(compile(original, &expanded)?);
    }
    Ok(())
}

/// Expand `?(..)` and `@(..)` groups into every plain glob they stand for
fn expand_extglob(original: &str, pattern: &str) -> Result<Vec<String>, PatternError> {
    let Some((start, kind)) = find_group(pattern) else {
        return Ok(vec![pattern.to_string()]);
    };
    if !matches!(kind, '?' | '@') {
        return Err(pattern_error(
            original,
            &format!("unsupported extglob group '{kind}(...)'"),
        ));
    }

    let body_start = start + 2;
    let close = pattern[body_start..]
        .find([')', '('])
        .map(|offset| body_start + offset);
    let close = match close {
        Some(index) if pattern.as_bytes()[index] == b')' => index,
        Some(_) => return Err(pattern_error(original, "nested extglob groups are not supported")),
        None => return Err(pattern_error(original, "unclosed extglob group")),
    };

    let prefix = &pattern[..start];
    let mut alternatives: Vec<&str> = pattern[body_start..close].split('|').collect();
    if kind == '?' {
        alternatives.insert(0, "");
    }

    let mut expanded = Vec::new();
    for rest in expand_extglob(original, &pattern[close + 1..])? {
        for alternative in &alternatives {
            let candidate = format!("{prefix}{alternative}{rest}");
            if !expanded.contains(&candidate) {
                expanded.push(candidate);
            }
        }
    }
    Ok(expanded)
}

/// Byte offset and kind of the first extglob group outside escapes and classes
fn find_group(pattern: &str) -> Option<(usize, char)> {
    let bytes = pattern.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 1,
            b'[' => {
                if let Some(offset) = pattern[index + 1..].find(']') {
                    index += offset + 1;
                }
            }
            kind @ (b'?' | b'@' | b'*' | b'+' | b'!') if bytes.get(index + 1) == Some(&b'(') => {
                return Some((index, kind as char));
            }
            _ => {}
        }
        index += 1;
    }
    None
}

fn pattern_error(original: &str, reason: &str) -> PatternError {
    PatternError {
        pattern: original.to_string(),
        reason: reason.to_string(),
    }
}

fn compile(original: &str, pattern: &str) -> Result<globset::Glob, PatternError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|err| PatternError {
            pattern: original.to_string(),
            reason: err.kind().to_string(),
        })
}

fn set_error(patterns: &[String], err: globset::Error) -> PatternError {
    PatternError {
        pattern: patterns.join(", "),
        reason: err.to_string(),
    }
}

/// Turn a file path into the form patterns are matched against
///
/// Paths under `base` are made relative to it, `\` becomes `/` and a leading
/// `./` is dropped.
pub fn normalize_path(path: &Path, base: Option<&Path>) -> String {
    let relative = base
        .and_then(|base| path.strip_prefix(base).ok())
        .unwrap_or(path);
    let mut normalized = relative.to_string_lossy().replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}
