//! Flattened `extends` chains
//!
//! A [`PolicyTree`] is a document with every inherited document folded in,
//! override globs compiled and rule entries validated. It is immutable and
//! can be shared across threads to compile many files.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::{DocumentResolver, GlobalAccess, OverrideBlock, PolicyDocument, RuleEntry};
use crate::error::LintrcError;
use crate::matcher::{FileSelector, PatternError, normalize_path};
use crate::result::Result;
use crate::source::{ConfigLocation, DocumentSource};

/// Settings contributed by one document section
#[derive(Debug, Clone)]
pub struct Layer {
    pub source: DocumentSource,
    pub location: ConfigLocation,
    pub env: Vec<(String, bool)>,
    pub globals: Vec<(String, GlobalAccess)>,
    pub plugins: Vec<String>,
    pub parser: Option<String>,
    pub rules: Vec<(String, RuleEntry)>,
    pub parser_options: Map<String, Value>,
    pub settings: Map<String, Value>,
}

impl Layer {
    fn from_document(document: &PolicyDocument, source: &DocumentSource) -> Result<Self> {
        Ok(Self {
            source: source.clone(),
            location: ConfigLocation::Root,
            env: clone_pairs(&document.env),
            globals: clone_pairs(&document.globals),
            plugins: document.plugins.clone(),
            parser: document.parser.clone(),
            rules: parse_rules(&document.rules, source, ConfigLocation::Root)?,
            parser_options: document.parser_options.clone(),
            settings: document.settings.clone(),
        })
    }

    fn from_override(block: &OverrideBlock, source: &DocumentSource, index: usize) -> Result<Self> {
        let location = ConfigLocation::Override(index);
        Ok(Self {
            source: source.clone(),
            location,
            env: clone_pairs(&block.env),
            globals: clone_pairs(&block.globals),
            plugins: block.plugins.clone(),
            parser: block.parser.clone(),
            rules: parse_rules(&block.rules, source, location)?,
            parser_options: block.parser_options.clone(),
            settings: block.settings.clone(),
        })
    }
}

/// Where a layer or ignore selector applies
///
/// A global scope applies to every file. Otherwise every selector must match
/// the path taken relative to the anchor directory.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    anchor: Option<PathBuf>,
    selectors: Vec<FileSelector>,
}

impl Scope {
    pub fn is_global(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Selectors from the outermost override block inwards
    pub fn selectors(&self) -> &[FileSelector] {
        &self.selectors
    }

    pub fn anchor(&self) -> Option<&Path> {
        self.anchor.as_deref()
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.is_global() {
            return true;
        }
        let relative = normalize_path(path, self.anchor.as_deref());
        self.selectors.iter().all(|selector| selector.is_match(&relative))
    }

    fn narrowed(&self, selector: FileSelector) -> Self {
        let mut scope = self.clone();
        scope.selectors.push(selector);
        scope
    }

    fn anchor_at(&mut self, dir: &Path) {
        if self.anchor.is_none() {
            self.anchor = Some(dir.to_path_buf());
        }
    }
}

/// A layer with the scope deciding which files it applies to
#[derive(Debug, Clone)]
pub struct ScopedLayer {
    pub scope: Scope,
    pub layer: Layer,
}

/// A document with its `extends` chain flattened
///
/// Layers are kept in application order: every extended document comes
/// first, with its override blocks directly after its own top-level layer,
/// then the extending document followed by its override blocks.
#[derive(Debug, Clone, Default)]
pub struct PolicyTree {
    layers: Vec<ScopedLayer>,
    ignore: Vec<Scope>,
    sources: Vec<DocumentSource>,
    base_dir: Option<PathBuf>,
}

impl PolicyTree {
    /// Flatten `document` and everything it extends
    pub fn build(
        document: &PolicyDocument,
        source: DocumentSource,
        resolver: &dyn DocumentResolver,
    ) -> Result<Self> {
        let mut builder = TreeBuilder {
            resolver,
            stack: Vec::new(),
            tree: PolicyTree::default(),
        };
        builder.visit(document, source, &Scope::default())?;
        let tree = builder.tree;
        debug!(
            "Built policy tree from {} document(s): {} base layer(s), {} override(s)",
            tree.sources.len(),
            tree.base_layers().count(),
            tree.overrides().count()
        );
        Ok(tree)
    }

    /// Resolve `reference` and flatten the resulting document
    pub fn from_reference(reference: &str, resolver: &dyn DocumentResolver) -> Result<Self> {
        let resolved = resolver.resolve(reference, &DocumentSource::Inline)?;
        Self::build(&resolved.document, resolved.source, resolver)
    }

    /// Stack trees found in parent directories, farthest first
    ///
    /// Each tree keeps its own anchor directory, so the result should be built
    /// from trees already given one with [`with_base_dir`](Self::with_base_dir).
    /// Reported paths are relative to the first tree's directory.
    pub fn cascade(trees: impl IntoIterator<Item = PolicyTree>) -> Self {
        let mut cascade = PolicyTree::default();
        for tree in trees {
            if cascade.base_dir.is_none() {
                cascade.base_dir = tree.base_dir;
            }
            cascade.layers.extend(tree.layers);
            cascade.ignore.extend(tree.ignore);
            for source in tree.sources {
                if !cascade.sources.contains(&source) {
                    cascade.sources.push(source);
                }
            }
        }
        cascade
    }

    /// Directory that relative patterns are anchored to
    ///
    /// Layers already anchored elsewhere keep their directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        for scoped in &mut self.layers {
            scoped.scope.anchor_at(&base_dir);
        }
        for scope in &mut self.ignore {
            scope.anchor_at(&base_dir);
        }
        self.base_dir = Some(base_dir);
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Every layer in application order
    pub fn layers(&self) -> &[ScopedLayer] {
        &self.layers
    }

    /// Layers applied to every file, in application order
    pub fn base_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(|scoped| scoped.scope.is_global())
            .map(|scoped| &scoped.layer)
    }

    /// Inherited and local top-level rules, last writer wins
    pub fn base_rules(&self) -> BTreeMap<String, RuleEntry> {
        let mut rules = BTreeMap::new();
        for layer in self.base_layers() {
            for (name, entry) in &layer.rules {
                rules.insert(name.clone(), entry.clone());
            }
        }
        rules
    }

    /// Inherited and local top-level environment flags
    pub fn base_env(&self) -> BTreeMap<String, bool> {
        let mut env = BTreeMap::new();
        for layer in self.base_layers() {
            for (name, enabled) in &layer.env {
                env.insert(name.clone(), *enabled);
            }
        }
        env
    }

    /// Every path-scoped layer, in application order
    pub fn overrides(&self) -> impl Iterator<Item = &ScopedLayer> {
        self.layers.iter().filter(|scoped| !scoped.scope.is_global())
    }

    /// Documents that contributed, in application order
    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    /// Path as reported in compiled policies
    pub fn relative_path(&self, path: &Path) -> String {
        normalize_path(path, self.base_dir.as_deref())
    }

    /// Layers that apply to `path`, in application order
    pub fn layers_for<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a ScopedLayer> + 'a {
        self.layers.iter().filter(move |scoped| scoped.scope.matches(path))
    }

    /// Path-scoped layers that apply to `path`, in application order
    pub fn matching_overrides<'a>(
        &'a self,
        path: &'a Path,
    ) -> impl Iterator<Item = &'a ScopedLayer> + 'a {
        self.layers_for(path).filter(|scoped| !scoped.scope.is_global())
    }

    /// Whether `path` matches any `ignorePatterns` entry
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.iter().any(|scope| scope.matches(path))
    }
}

struct TreeBuilder<'r> {
    resolver: &'r dyn DocumentResolver,
    stack: Vec<DocumentSource>,
    tree: PolicyTree,
}

impl TreeBuilder<'_> {
    fn visit(&mut self, document: &PolicyDocument, source: DocumentSource, scope: &Scope) -> Result<()> {
        if let Some(start) = self.stack.iter().position(|visiting| *visiting == source) {
            let chain = self.stack[start..]
                .iter()
                .chain(std::iter::once(&source))
                .map(ToString::to_string)
                .collect();
            return Err(LintrcError::ConfigurationCycle { chain });
        }

        self.stack.push(source.clone());
        self.extend(&document.extends, &source, scope)?;
        trace!("Applying {}", source);
        self.tree.layers.push(ScopedLayer {
            scope: scope.clone(),
            layer: Layer::from_document(document, &source)?,
        });

        for (index, block) in document.overrides.iter().enumerate() {
            let location = ConfigLocation::Override(index);
            let selector = FileSelector::new(&block.files, &block.excluded_files)
                .map_err(|err| glob_error(err, &source, location))?;
            let block_scope = scope.narrowed(selector);
            self.extend(&block.extends, &source, &block_scope)?;
            self.tree.layers.push(ScopedLayer {
                layer: Layer::from_override(block, &source, index)?,
                scope: block_scope,
            });
        }

        if !document.ignore_patterns.is_empty() {
            let selector = FileSelector::any_of(&document.ignore_patterns)
                .map_err(|err| glob_error(err, &source, ConfigLocation::Root))?;
            self.tree.ignore.push(scope.narrowed(selector));
        }
        self.stack.pop();

        if !self.tree.sources.contains(&source) {
            self.tree.sources.push(source);
        }
        Ok(())
    }

    fn extend(&mut self, references: &[String], from: &DocumentSource, scope: &Scope) -> Result<()> {
        for reference in references {
            let resolved = self.resolver.resolve(reference, from)?;
            debug!("Resolved extends '{}' from {} to {}", reference, from, resolved.source);
            self.visit(&resolved.document, resolved.source, scope)?;
        }
        Ok(())
    }
}

fn glob_error(err: PatternError, source: &DocumentSource, location: ConfigLocation) -> LintrcError {
    LintrcError::InvalidGlobPattern {
        pattern: err.pattern,
        source_doc: source.clone(),
        location,
        reason: err.reason,
    }
}

fn parse_rules(
    rules: &indexmap::IndexMap<String, Value>,
    source: &DocumentSource,
    location: ConfigLocation,
) -> Result<Vec<(String, RuleEntry)>> {
    rules
        .iter()
        .map(|(name, value)| Ok((name.clone(), RuleEntry::parse(name, value, source, location)?)))
        .collect()
}

fn clone_pairs<V: Clone>(map: &indexmap::IndexMap<String, V>) -> Vec<(String, V)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
