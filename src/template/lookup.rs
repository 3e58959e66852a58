//! Template lookups: in-memory and file-system backed

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{CompiledTemplate, Template, TemplateLookup};
use crate::config::RendererConfig;
use crate::error::RenderError;

/// Candidate logical paths for `path`, in search order
///
/// Partials live in files prefixed with an underscore, so `users/account`
/// becomes `users/_account`. A path without a directory is tried under every
/// prefix in order.
pub fn candidate_paths(path: &str, prefixes: &[String], partial: bool) -> Vec<String> {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };
    let file = if partial {
        format!("_{}", name)
    } else {
        name.to_string()
    };
    let base = match dir {
        Some(dir) => format!("{}/{}", dir, file),
        None => file,
    };

    if prefixes.is_empty() {
        return vec![base];
    }
    prefixes
        .iter()
        .map(|prefix| {
            if prefix.is_empty() {
                base.clone()
            } else {
                format!("{}/{}", prefix, base)
            }
        })
        .collect()
}

/// Bare candidate first, then each extension
fn with_extensions<'a>(candidate: &'a str, extensions: &'a [String]) -> impl Iterator<Item = String> + 'a {
    std::iter::once(candidate.to_string())
        .chain(extensions.iter().map(move |ext| format!("{}.{}", candidate, ext)))
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string()]
}

/// Templates registered by logical path, compiled once at registration
#[derive(Debug)]
pub struct InMemoryLookup {
    templates: HashMap<String, Arc<CompiledTemplate>>,
    extensions: Vec<String>,
}

impl Default for InMemoryLookup {
    fn default() -> Self {
        Self {
            templates: HashMap::new(),
            extensions: default_extensions(),
        }
    }
}

impl InMemoryLookup {
    /// Create a new empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty lookup trying the configured extensions
    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new().with_extensions(config.extensions.iter().cloned())
    }

    /// Set the extensions tried after the bare name
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Register a template under its file path, e.g. `users/_account.html`
    pub fn add(&mut self, path: impl Into<String>, source: &str) -> Result<(), RenderError> {
        let path = path.into();
        let template = CompiledTemplate::compile(path.clone(), source)?;
        self.templates.insert(path, Arc::new(template));
        Ok(())
    }

    /// Builder form of [`InMemoryLookup::add`]
    pub fn with_template(mut self, path: impl Into<String>, source: &str) -> Result<Self, RenderError> {
        self.add(path, source)?;
        Ok(self)
    }

    /// Check if a file path is registered
    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateLookup for InMemoryLookup {
    fn find(
        &self,
        path: &str,
        prefixes: &[String],
        partial: bool,
        _required_locals: &[String],
    ) -> Result<Arc<dyn Template>, RenderError> {
        for candidate in candidate_paths(path, prefixes, partial) {
            for key in with_extensions(&candidate, &self.extensions) {
                if let Some(template) = self.templates.get(&key) {
                    return Ok(Arc::clone(template) as Arc<dyn Template>);
                }
            }
        }
        Err(RenderError::not_found(path, prefixes))
    }
}

/// Templates read from a directory tree; files are compiled on every find
#[derive(Debug, Clone)]
pub struct FileSystemLookup {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FileSystemLookup {
    /// Create a new lookup rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
        }
    }

    /// Lookup rooted at `root`, trying the configured extensions
    pub fn from_config(root: impl Into<PathBuf>, config: &RendererConfig) -> Self {
        Self::new(root).with_extensions(config.extensions.iter().cloned())
    }

    /// Set the extensions tried after the bare name
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, key: &str, full_path: &Path) -> Result<Arc<dyn Template>, RenderError> {
        let content = std::fs::read_to_string(full_path).map_err(|e| RenderError::Io {
            path: full_path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Arc::new(CompiledTemplate::compile(key, &content)?))
    }
}

impl TemplateLookup for FileSystemLookup {
    fn find(
        &self,
        path: &str,
        prefixes: &[String],
        partial: bool,
        _required_locals: &[String],
    ) -> Result<Arc<dyn Template>, RenderError> {
        for candidate in candidate_paths(path, prefixes, partial) {
            for key in with_extensions(&candidate, &self.extensions) {
                let full_path = self.root.join(&key);
                if full_path.is_file() {
                    return self.load(&key, &full_path);
                }
            }
        }
        Err(RenderError::not_found(path, prefixes))
    }
}
