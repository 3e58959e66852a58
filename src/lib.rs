//! Partial Render - resolve and render partial templates
//!
//! This library turns a partial render request (an explicit path, a single
//! object, or a collection of objects) into concrete template lookups, binds
//! objects to local variables by naming convention, and joins the rendered
//! segments with an optional spacer and layout.
//!
//! # Example
//!
//! ```rust
//! use partial_render::{render_partial, InMemoryLookup, PartialOptions, Record};
//!
//! let lookup = InMemoryLookup::new()
//!     .with_template("users/_account.html", "<p>{{ account.name }}</p>")
//!     .unwrap();
//!
//! let options = PartialOptions::path("users/account")
//!     .with_object(Record::new("Account").with_field("name", "ada"));
//!
//! let html = render_partial(lookup, options).unwrap().unwrap();
//! assert_eq!(html.as_str(), "<p>ada</p>");
//! ```

pub mod config;
pub mod error;
pub mod naming;
pub mod partial;
pub mod template;
pub mod value;

use std::sync::Arc;

pub use config::{ConfigError, RendererConfig};
pub use error::{RenderError, TemplateSyntaxError};
pub use naming::ModelName;
pub use partial::{PartialOptions, PartialPathCache, PartialRenderer, RenderMode};
pub use template::{
    CompiledTemplate, FileSystemLookup, InMemoryLookup, Template, TemplateLookup, ViewContext,
};
pub use value::{Locals, Object, Record, SafeString, Value};

/// Render one partial request with default configuration
///
/// Uses a fresh path memo, so repeated calls do not share memoized paths;
/// build a [`PartialRenderer`] to keep the memo across calls.
pub fn render_partial(
    lookup: impl TemplateLookup + 'static,
    options: PartialOptions,
) -> Result<Option<SafeString>, RenderError> {
    let renderer = PartialRenderer::new(Arc::new(lookup), Arc::new(PartialPathCache::new()));
    renderer.render(&renderer.view(), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_partial_single() {
        let lookup = InMemoryLookup::new()
            .with_template("users/_account", "{{ account }}")
            .expect("should compile");
        let out = render_partial(lookup, PartialOptions::path("users/account").with_object("ada"))
            .expect("should render");
        assert_eq!(out, Some(SafeString::from("ada")));
    }

    #[test]
    fn test_render_partial_missing_template() {
        let result = render_partial(InMemoryLookup::new(), PartialOptions::path("users/account"));
        assert!(matches!(result, Err(RenderError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_render_partial_empty_collection() {
        let out = render_partial(
            InMemoryLookup::new(),
            PartialOptions::value(Vec::<Value>::new()),
        )
        .expect("empty collection is not an error");
        assert_eq!(out, None);
    }
}
