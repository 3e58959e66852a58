//! Partial resolution and rendering
//!
//! A render call flows through normalization ([`normalize`]), path resolution
//! ([`PathResolver`]), collection expansion ([`expand`]) and variable binding
//! ([`VariableBinding`]) before [`PartialRenderer`] executes the templates.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use partial_render::{InMemoryLookup, PartialOptions, PartialPathCache, PartialRenderer, Record, Value};
//!
//! let lookup = InMemoryLookup::new()
//!     .with_template("users/_user.html", "<li>{{ user.name }}</li>")
//!     .unwrap();
//! let renderer = PartialRenderer::new(Arc::new(lookup), Arc::new(PartialPathCache::new()));
//!
//! let users: Vec<Value> = vec![
//!     Record::new("User").with_field("name", "ada").into(),
//!     Record::new("User").with_field("name", "grace").into(),
//! ];
//! let html = renderer
//!     .render(&renderer.view(), PartialOptions::value(users))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(html.as_str(), "<li>ada</li><li>grace</li>");
//! ```

mod binding;
mod cache;
mod collection;
mod options;
mod path;
mod renderer;

pub use binding::{default_variable_name, is_identifier, VariableBinding};
pub use cache::TemplateCache;
pub use collection::{expand, Expansion};
pub use options::{normalize, ElementDescriptor, Partial, PartialOptions, RenderMode, RenderRequest};
pub use path::{PartialPathCache, PathResolver};
pub use renderer::PartialRenderer;
