//! lintrc rules
//!
//! Built-in rule catalog, plugin rule tables and presets. The catalog only
//! describes rules (names, categories, default options); it is what the
//! resolver validates rule names against.

pub mod catalog;
pub mod plugins;
pub mod presets;
pub mod registry;
pub mod util;

pub use catalog::{BuiltinRules, RuleCategory, RuleMetadata};
pub use plugins::{KNOWN_PLUGINS, all_plugin_rules, plugin_rules};
pub use presets::Presets;
pub use registry::BuiltinRegistry;
