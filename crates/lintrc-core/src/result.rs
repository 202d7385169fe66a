//! Result type alias for lintrc operations

use crate::error::LintrcError;

/// Standard Result type for policy loading and compilation
pub type Result<T> = std::result::Result<T, LintrcError>;
