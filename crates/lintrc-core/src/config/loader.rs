//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::document::PolicyDocument;
use super::resolve::{DocumentResolver, PRESET_PREFIX, ResolvedDocument};
use crate::error::LintrcError;
use crate::result::Result;
use crate::source::DocumentSource;
use crate::tree::PolicyTree;

/// Config file names looked up in each directory, highest priority first
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".lintrc.json",
    ".lintrc.jsonc",
    ".lintrc.yaml",
    ".lintrc.yml",
    ".lintrc.toml",
];

/// Serialization format of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON with comments and trailing commas
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the file extension; unknown extensions read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
        }
    }

    fn parse(&self, content: &str) -> std::result::Result<PolicyDocument, String> {
        match self {
            Self::Json => json5::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find the nearest config file, starting at `start_dir` and walking up
    pub fn auto_discover(start_dir: &Path) -> Result<Option<PathBuf>> {
        let start = start_dir
            .canonicalize()
            .map_err(|e| LintrcError::read_failed(start_dir, e))?;

        for dir in start.ancestors() {
            if let Some(path) = Self::config_in(dir) {
                tracing::debug!("Found config: {}", path.display());
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Every config file from `start_dir` upwards, nearest first
    ///
    /// Stops after the first document declaring `root: true`.
    pub fn discover_chain(start_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(Self::discover_documents(start_dir)?
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    fn discover_documents(start_dir: &Path) -> Result<Vec<(PathBuf, PolicyDocument)>> {
        let start = start_dir
            .canonicalize()
            .map_err(|e| LintrcError::read_failed(start_dir, e))?;

        let mut chain = Vec::new();
        for dir in start.ancestors() {
            let Some(path) = Self::config_in(dir) else {
                continue;
            };
            let document = Self::load_from_file(&path)?;
            tracing::debug!("Config chain entry: {} (root: {})", path.display(), document.root);
            let root = document.root;
            chain.push((path, document));
            if root {
                break;
            }
        }
        Ok(chain)
    }

    fn config_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load a policy document from a specific file
    pub fn load_from_file(path: &Path) -> Result<PolicyDocument> {
        let content = fs::read_to_string(path).map_err(|e| LintrcError::read_failed(path, e))?;
        let document = Self::parse_str(&content, ConfigFormat::from_path(path), path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(document)
    }

    /// Parse document text; `path` is only used in error messages
    pub fn parse_str(content: &str, format: ConfigFormat, path: &Path) -> Result<PolicyDocument> {
        format.parse(content).map_err(|message| LintrcError::Parse {
            path: path.to_path_buf(),
            format: format.name(),
            message,
        })
    }

    /// Resolve the config file to use: `custom_path` if given, otherwise discovery
    pub fn locate(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = custom_path {
            if !path.is_file() {
                return Err(LintrcError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(path.to_path_buf());
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        Self::auto_discover(search_dir)?.ok_or_else(no_config_found)
    }

    /// Load config from path or auto-discover
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<(PathBuf, PolicyDocument)> {
        let path = Self::locate(custom_path, start_dir)?;
        let document = Self::load_from_file(&path)?;
        Ok((path, document))
    }

    /// Load `path`, resolve its `extends` chain from disk and build a tree
    ///
    /// `lintrc:<name>` references go to `presets`. Patterns are anchored at
    /// the directory holding `path`.
    pub fn load_tree(path: &Path, presets: Option<Arc<dyn DocumentResolver>>) -> Result<PolicyTree> {
        let canonical = path
            .canonicalize()
            .map_err(|e| LintrcError::read_failed(path, e))?;
        let document = Self::load_from_file(&canonical)?;
        Self::build_tree(canonical, &document, &FileResolver::new(presets))
    }

    /// Build one tree from every config between `start_dir` and the nearest
    /// `root: true` document
    ///
    /// Configs in parent directories apply first. Each config's patterns stay
    /// anchored at its own directory. Returns the config paths, nearest first.
    pub fn load_cascade(
        start_dir: &Path,
        presets: Option<Arc<dyn DocumentResolver>>,
    ) -> Result<(Vec<PathBuf>, PolicyTree)> {
        let chain = Self::discover_documents(start_dir)?;
        if chain.is_empty() {
            return Err(no_config_found());
        }

        let resolver = FileResolver::new(presets);
        let trees = chain
            .iter()
            .rev()
            .map(|(path, document)| Self::build_tree(path.clone(), document, &resolver))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Cascaded {} config(s) from {}", trees.len(), start_dir.display());

        let paths = chain.into_iter().map(|(path, _)| path).collect();
        Ok((paths, PolicyTree::cascade(trees)))
    }

    fn build_tree(path: PathBuf, document: &PolicyDocument, resolver: &FileResolver) -> Result<PolicyTree> {
        let dir = path.parent().map(Path::to_path_buf);
        let tree = PolicyTree::build(document, DocumentSource::File(path), resolver)?;
        Ok(match dir {
            Some(dir) => tree.with_base_dir(dir),
            None => tree,
        })
    }
}

fn no_config_found() -> LintrcError {
    LintrcError::config_error(format!(
        "No config file found ({}). Run 'lintrc config init' to create one",
        CONFIG_FILE_NAMES.join(", ")
    ))
}

/// Resolves `extends` references to files relative to the referencing document
pub struct FileResolver {
    presets: Option<Arc<dyn DocumentResolver>>,
}

impl FileResolver {
    pub fn new(presets: Option<Arc<dyn DocumentResolver>>) -> Self {
        Self { presets }
    }
}

impl DocumentResolver for FileResolver {
    fn resolve(&self, reference: &str, from: &DocumentSource) -> Result<ResolvedDocument> {
        if reference.starts_with(PRESET_PREFIX) {
            return match &self.presets {
                Some(presets) => presets.resolve(reference, from),
                None => Err(LintrcError::UnresolvedExtends {
                    reference: reference.to_string(),
                    source_doc: from.clone(),
                    reason: "no presets are available".to_string(),
                }),
            };
        }

        let base = from.path().and_then(Path::parent).unwrap_or_else(|| Path::new("."));
        let candidate = base.join(reference);
        if !candidate.is_file() {
            return Err(LintrcError::UnresolvedExtends {
                reference: reference.to_string(),
                source_doc: from.clone(),
                reason: format!("file not found: {}", candidate.display()),
            });
        }

        let canonical = candidate
            .canonicalize()
            .map_err(|e| LintrcError::read_failed(&candidate, e))?;
        let document = ConfigLoader::load_from_file(&canonical)?;
        Ok(ResolvedDocument::new(DocumentSource::File(canonical), document))
    }
}
