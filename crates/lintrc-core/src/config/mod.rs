//! Configuration system for lintrc
//!
//! - Policy documents in JSON/JSONC, YAML or TOML
//! - Auto-discovery by traversing up directories, stopping at `root: true`
//! - Inheritance through `extends` (relative paths or `lintrc:<preset>`)
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "$schema": "./node_modules/lintrc/schema.json",
//!   "root": true,
//!   "extends": ["lintrc:recommended"],
//!   "env": { "browser": true, "es2022": true },
//!   "parserOptions": { "ecmaVersion": 2022, "sourceType": "module" },
//!   "rules": {
//!     "semi": ["error", "always"],
//!     "no-console": "warn"
//!   },
//!   "ignorePatterns": ["dist/**"],
//!   "overrides": [
//!     {
//!       "files": ["**/*.test.ts"],
//!       "env": { "jest": true },
//!       "rules": { "no-console": "off" }
//!     }
//!   ]
//! }
//! ```

mod document;
mod loader;
mod merge;
mod resolve;
mod rule;

pub use document::{GlobalAccess, OverrideBlock, PolicyDocument};
pub use loader::{CONFIG_FILE_NAMES, ConfigFormat, ConfigLoader, FileResolver};
pub use merge::merge_json;
pub(crate) use merge::integral;
pub use resolve::{DocumentResolver, InMemoryDocuments, NoExtends, PRESET_PREFIX, ResolvedDocument};
pub use rule::{RuleEntry, RuleSetting, Severity};
