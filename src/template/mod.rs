//! Template collaborators used by the partial renderer
//!
//! The renderer only depends on the [`Template`] and [`TemplateLookup`] traits.
//! This module also ships a minimal tag language so partials can be written
//! and rendered without an external engine:
//!
//! ```text
//! <li>{{ account.name }}</li>        // local variable with field access
//! <div>{{ yield }}</div>             // the block a layout wraps
//! <aside>{{ yield sidebar }}</aside> // a named content_for block
//! ```

pub mod ast;
mod compiled;
mod grammar;
pub mod lexer;
mod lookup;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use compiled::CompiledTemplate;
pub use grammar::parse;
pub use lookup::{candidate_paths, FileSystemLookup, InMemoryLookup};

use crate::error::RenderError;
use crate::value::{Locals, SafeString};

/// Callback a template invokes at a yield point, with an optional block name
pub type YieldBlock<'a> = &'a dyn Fn(Option<&str>) -> SafeString;

/// An executable template
pub trait Template: fmt::Debug + Send + Sync {
    /// Stable name for diagnostics
    fn identifier(&self) -> &str;

    fn render(
        &self,
        view: &ViewContext,
        locals: &Locals,
        block: Option<YieldBlock<'_>>,
    ) -> Result<SafeString, RenderError>;
}

/// Resolves a template path against search prefixes
pub trait TemplateLookup: Send + Sync {
    /// Find the template for `path`. An empty `prefixes` means `path` is
    /// addressed from the root. `required_locals` lists the local names the
    /// caller will bind.
    fn find(
        &self,
        path: &str,
        prefixes: &[String],
        partial: bool,
        required_locals: &[String],
    ) -> Result<Arc<dyn Template>, RenderError>;
}

/// The view a render call runs in
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    prefixes: Vec<String>,
    content_for: HashMap<String, SafeString>,
}

impl ViewContext {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            content_for: HashMap::new(),
        }
    }

    /// Store a named block layouts can yield with `{{ yield name }}`
    pub fn with_content_for(mut self, name: impl Into<String>, content: impl Into<SafeString>) -> Self {
        self.content_for.insert(name.into(), content.into());
        self
    }

    /// Ordered search prefixes of the lookup context
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// The prefix the current template was found under
    pub fn current_prefix(&self) -> &str {
        self.prefixes.first().map(String::as_str).unwrap_or("")
    }

    /// Content for a yield point: an unnamed yield with a block gets the block,
    /// anything else reads the named `content_for` entry (`layout` by default)
    pub fn layout_for(&self, name: Option<&str>, block: Option<&SafeString>) -> SafeString {
        match (name, block) {
            (None, Some(block)) => block.clone(),
            (name, _) => self
                .content_for
                .get(name.unwrap_or("layout"))
                .cloned()
                .unwrap_or_default(),
        }
    }
}
