//! Render options and their normalization into a render request

use super::binding::{is_identifier, VariableBinding};
use super::collection::{expand, Expansion};
use super::path::PathResolver;
use crate::error::RenderError;
use crate::value::{Locals, SafeString, Value};

/// What the caller asked to render
#[derive(Debug, Clone)]
pub enum Partial {
    /// An explicit partial path, taken literally
    Path(String),
    /// An object or array-like value whose path follows the naming convention
    Value(Value),
}

/// The options bag of a partial render call
#[derive(Debug, Clone, Default)]
pub struct PartialOptions {
    pub partial: Option<Partial>,
    pub locals: Locals,
    /// Explicit object for a string partial
    pub object: Option<Value>,
    /// Collection rendered against a string partial
    pub collection: Option<Value>,
    /// Explicit variable name
    pub as_name: Option<String>,
    pub layout: Option<String>,
    pub spacer_template: Option<String>,
    /// Pre-rendered block content, yielded by the partial or, without a
    /// partial, by the layout
    pub block: Option<SafeString>,
}

impl PartialOptions {
    /// Render the partial at an explicit path
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            partial: Some(Partial::Path(path.into())),
            ..Self::default()
        }
    }

    /// Render an object, or a collection when the value is array-like
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            partial: Some(Partial::Value(value.into())),
            ..Self::default()
        }
    }

    /// Render a block through a layout, without a partial
    pub fn block(layout: impl Into<String>, block: impl Into<SafeString>) -> Self {
        Self {
            layout: Some(layout.into()),
            block: Some(block.into()),
            ..Self::default()
        }
    }

    pub fn with_locals(mut self, locals: Locals) -> Self {
        self.locals = locals;
        self
    }

    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name.into(), value.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<Value>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<Value>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_as(mut self, name: impl Into<String>) -> Self {
        self.as_name = Some(name.into());
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_spacer_template(mut self, spacer: impl Into<String>) -> Self {
        self.spacer_template = Some(spacer.into());
        self
    }

    pub fn with_block(mut self, block: impl Into<SafeString>) -> Self {
        self.block = Some(block.into());
        self
    }
}

/// Decided once during normalization, never changed afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Single,
    CollectionWithTemplate,
    CollectionWithoutTemplate,
}

/// Path and binding of one element of a heterogeneous collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
    pub path: String,
    pub binding: VariableBinding,
}

/// A normalized render request, alive for one render call
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub mode: RenderMode,
    /// `None` only for heterogeneous collections
    pub path: Option<String>,
    pub object: Option<Value>,
    pub collection: Option<Vec<Value>>,
    pub locals: Locals,
    pub explicit_name: Option<String>,
    /// Shared binding, absent for heterogeneous collections
    pub binding: Option<VariableBinding>,
    /// One per element, heterogeneous collections only
    pub elements: Vec<ElementDescriptor>,
    pub layout: Option<String>,
    pub spacer_template: Option<String>,
    pub block: Option<SafeString>,
}

impl RenderRequest {
    fn from_options(options: PartialOptions, mode: RenderMode) -> Self {
        Self {
            mode,
            path: None,
            object: options.object,
            collection: None,
            locals: options.locals,
            explicit_name: options.as_name,
            binding: None,
            elements: Vec::new(),
            layout: options.layout,
            spacer_template: options.spacer_template,
            block: options.block,
        }
    }
}

/// Turn the options bag into a request with a fixed render mode
pub fn normalize(
    mut options: PartialOptions,
    resolver: &PathResolver<'_>,
) -> Result<RenderRequest, RenderError> {
    match options.partial.take() {
        None => Err(RenderError::MissingPartial),
        Some(Partial::Path(path)) => {
            check_explicit_name(&options, &path)?;
            normalize_path(options, path)
        }
        Some(Partial::Value(value)) => {
            check_explicit_name(&options, value.type_name())?;
            normalize_value(options, value, resolver)
        }
    }
}

/// An `as` override must be an identifier whatever kind of partial it names
fn check_explicit_name(options: &PartialOptions, partial: &str) -> Result<(), RenderError> {
    match options.as_name.as_deref() {
        Some(name) if !is_identifier(name) => Err(RenderError::InvalidIdentifier {
            partial: partial.to_string(),
            name: name.to_string(),
        }),
        _ => Ok(()),
    }
}

/// A string partial, optionally repeated over the `collection` option
fn normalize_path(mut options: PartialOptions, path: String) -> Result<RenderRequest, RenderError> {
    // A collection option that is not array-like renders as empty
    let collection = options
        .collection
        .take()
        .map(|value| value.as_sequence().unwrap_or_default());

    let binding = VariableBinding::bind(&path, options.as_name.as_deref(), collection.is_some());
    if !binding.is_valid() {
        return Err(RenderError::InvalidIdentifier {
            name: binding.name,
            partial: path,
        });
    }

    let mode = if collection.is_some() {
        RenderMode::CollectionWithTemplate
    } else {
        RenderMode::Single
    };

    let mut request = RenderRequest::from_options(options, mode);
    request.path = Some(path);
    request.collection = collection;
    request.binding = Some(binding);
    Ok(request)
}

/// An object or array-like partial; paths follow the naming convention
fn normalize_value(
    mut options: PartialOptions,
    value: Value,
    resolver: &PathResolver<'_>,
) -> Result<RenderRequest, RenderError> {
    let collection = match value.as_sequence() {
        Some(items) => Some(items),
        None => options
            .collection
            .take()
            .map(|c| c.as_sequence().unwrap_or_default()),
    };

    let Some(collection) = collection else {
        let path = resolver.resolve(&value)?;
        let binding = VariableBinding::bind(&path, options.as_name.as_deref(), false);
        let mut request = RenderRequest::from_options(options, RenderMode::Single);
        request.path = Some(path);
        request.object = Some(value);
        request.binding = Some(binding);
        return Ok(request);
    };

    let explicit = options.as_name.clone();
    let mut request = match expand(&collection, resolver)? {
        Expansion::Homogeneous { path } => {
            let binding = VariableBinding::bind(&path, explicit.as_deref(), true);
            let mut request = RenderRequest::from_options(options, RenderMode::CollectionWithTemplate);
            request.path = Some(path);
            request.binding = Some(binding);
            request
        }
        Expansion::Heterogeneous { paths } => {
            let mut request = RenderRequest::from_options(options, RenderMode::CollectionWithoutTemplate);
            request.elements = paths
                .into_iter()
                .map(|path| ElementDescriptor {
                    binding: VariableBinding::bind(&path, explicit.as_deref(), true),
                    path,
                })
                .collect();
            request
        }
    };
    request.object = Some(value);
    request.collection = Some(collection);
    Ok(request)
}
