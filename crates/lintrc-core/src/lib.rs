//! lintrc core
//!
//! Configuration resolution for a JavaScript/TypeScript linter: the policy
//! document model, `extends` flattening, override matching and compilation
//! of a file-specific effective policy.

pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod environments;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod registry;
pub mod result;
pub mod source;
pub mod tree;

// Re-export commonly used types
pub use compiler::{CompileOptions, PolicyCompiler};
pub use config::{
    ConfigFormat, ConfigLoader, DocumentResolver, FileResolver, GlobalAccess, InMemoryDocuments,
    OverrideBlock, PolicyDocument, ResolvedDocument, RuleEntry, RuleSetting, Severity,
};
pub use diagnostics::{ConfigDiagnostic, DiagnosticCode, DiagnosticLevel};
pub use error::{ErrorKind, LintrcError};
pub use matcher::FileSelector;
pub use policy::EffectivePolicy;
pub use registry::{PermissiveRegistry, RuleRegistry};
pub use result::Result;
pub use source::{ConfigLocation, DocumentSource};
pub use tree::PolicyTree;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with("lintrc=info");
}

/// Initialize tracing with a fallback filter used when `RUST_LOG` is unset
pub fn init_tracing_with(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
