//! Resolution of `extends` references

use indexmap::IndexMap;
use std::sync::Arc;

use super::PolicyDocument;
use crate::error::LintrcError;
use crate::result::Result;
use crate::source::DocumentSource;

/// Prefix of references to built-in presets (`lintrc:recommended`)
pub const PRESET_PREFIX: &str = "lintrc:";

/// A document returned by a resolver together with its identity
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Stable identity, used for cycle detection and in messages
    pub source: DocumentSource,
    pub document: Arc<PolicyDocument>,
}

impl ResolvedDocument {
    pub fn new(source: DocumentSource, document: impl Into<Arc<PolicyDocument>>) -> Self {
        Self {
            source,
            document: document.into(),
        }
    }
}

/// Turns an `extends` reference into a document
///
/// Implementations decide what a reference means (a path, a preset name, a
/// key in a map). The resolver itself never touches the file system.
pub trait DocumentResolver: Send + Sync {
    /// Resolve `reference` as written in the document identified by `from`
    fn resolve(&self, reference: &str, from: &DocumentSource) -> Result<ResolvedDocument>;
}

/// Resolver over a fixed set of named documents
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocuments {
    documents: IndexMap<String, Arc<PolicyDocument>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, document: PolicyDocument) {
        self.documents.insert(name.into(), Arc::new(document));
    }

    pub fn with(mut self, name: impl Into<String>, document: PolicyDocument) -> Self {
        self.insert(name, document);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PolicyDocument>> {
        self.documents.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl DocumentResolver for InMemoryDocuments {
    fn resolve(&self, reference: &str, from: &DocumentSource) -> Result<ResolvedDocument> {
        self.documents
            .get(reference)
            .map(|document| ResolvedDocument {
                source: DocumentSource::named(reference),
                document: Arc::clone(document),
            })
            .ok_or_else(|| LintrcError::UnresolvedExtends {
                reference: reference.to_string(),
                source_doc: from.clone(),
                reason: "no document registered under that name".to_string(),
            })
    }
}

/// Resolver for documents that must not extend anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtends;

impl DocumentResolver for NoExtends {
    fn resolve(&self, reference: &str, from: &DocumentSource) -> Result<ResolvedDocument> {
        Err(LintrcError::UnresolvedExtends {
            reference: reference.to_string(),
            source_doc: from.clone(),
            reason: "no resolver configured".to_string(),
        })
    }
}
