//! Partial rendering: single objects, collections, spacers and layouts

use std::sync::Arc;

use super::binding::VariableBinding;
use super::cache::TemplateCache;
use super::options::{normalize, PartialOptions, RenderMode, RenderRequest};
use super::path::{PartialPathCache, PathResolver};
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::template::{Template, TemplateLookup, ViewContext};
use crate::value::{Locals, SafeString, Value};

/// Renders partials against a template lookup
///
/// The path memo is shared across calls (and threads); everything else a
/// render call needs is created inside the call.
#[derive(Clone)]
pub struct PartialRenderer {
    lookup: Arc<dyn TemplateLookup>,
    paths: Arc<PartialPathCache>,
    config: RendererConfig,
}

impl PartialRenderer {
    pub fn new(lookup: Arc<dyn TemplateLookup>, paths: Arc<PartialPathCache>) -> Self {
        Self {
            lookup,
            paths,
            config: RendererConfig::default(),
        }
    }

    /// Prefixes and path qualification come from `config`; the lookup was
    /// already built, so give it the same config through its `from_config`
    pub fn with_config(mut self, config: RendererConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// View context using the configured search prefixes
    pub fn view(&self) -> ViewContext {
        ViewContext::new(self.config.prefixes.iter().cloned())
    }

    /// Render a partial request
    ///
    /// Returns `None` when a collection is empty or absent; that is a success,
    /// not an error.
    pub fn render(
        &self,
        view: &ViewContext,
        options: PartialOptions,
    ) -> Result<Option<SafeString>, RenderError> {
        if options.partial.is_none() {
            return self.render_block(view, options).map(Some);
        }

        let resolver = PathResolver::new(
            &self.paths,
            view.current_prefix(),
            self.config.namespace_object_paths,
        );
        let request = normalize(options, &resolver)?;

        match request.mode {
            RenderMode::Single => self.render_single(view, request).map(Some),
            RenderMode::CollectionWithTemplate | RenderMode::CollectionWithoutTemplate => {
                self.render_collection(view, request)
            }
        }
    }

    /// Explicit paths are looked up from the root, bare names under the prefixes
    fn find_template(
        &self,
        view: &ViewContext,
        path: &str,
        required_locals: &[String],
    ) -> Result<Arc<dyn Template>, RenderError> {
        let prefixes: &[String] = if path.contains('/') {
            &[]
        } else {
            view.prefixes()
        };
        self.lookup.find(path, prefixes, true, required_locals)
    }

    fn render_single(
        &self,
        view: &ViewContext,
        request: RenderRequest,
    ) -> Result<SafeString, RenderError> {
        let RenderRequest {
            path,
            object,
            mut locals,
            binding,
            layout,
            block,
            ..
        } = request;
        let (Some(path), Some(binding)) = (path, binding) else {
            return Err(RenderError::MissingPartial);
        };

        let template = self.find_template(view, &path, &required_locals(&locals, &binding))?;
        let _span = tracing::debug_span!("render_partial", identifier = template.identifier()).entered();

        // An explicit object wins over whatever the caller bound under the name
        let object = object
            .or_else(|| locals.get(&binding.name).cloned())
            .unwrap_or(Value::Null);
        locals.insert(binding.name.clone(), object);

        let yield_block = |name: Option<&str>| view.layout_for(name, block.as_ref());
        let content = template.render(view, &locals, Some(&yield_block))?;

        match layout {
            Some(layout) => self.wrap_in_layout(view, &layout, &locals, content),
            None => Ok(content),
        }
    }

    fn wrap_in_layout(
        &self,
        view: &ViewContext,
        layout: &str,
        locals: &Locals,
        content: SafeString,
    ) -> Result<SafeString, RenderError> {
        let template = self.find_template(view, layout, &local_names(locals))?;
        apply_layout(view, template.as_ref(), locals, content)
    }

    /// Collection layouts are looked up once and applied to every element
    fn find_layout(
        &self,
        view: &ViewContext,
        request: &RenderRequest,
    ) -> Result<Option<Arc<dyn Template>>, RenderError> {
        request
            .layout
            .as_deref()
            .map(|layout| self.find_template(view, layout, &local_names(&request.locals)))
            .transpose()
    }

    /// Without a partial, the layout is rendered around the caller's block
    fn render_block(
        &self,
        view: &ViewContext,
        options: PartialOptions,
    ) -> Result<SafeString, RenderError> {
        match (options.layout, options.block) {
            (Some(layout), Some(block)) => self.wrap_in_layout(view, &layout, &options.locals, block),
            _ => Err(RenderError::MissingPartial),
        }
    }

    fn render_collection(
        &self,
        view: &ViewContext,
        request: RenderRequest,
    ) -> Result<Option<SafeString>, RenderError> {
        let collection = match &request.collection {
            Some(collection) if !collection.is_empty() => collection,
            _ => return Ok(None),
        };

        let segments = match request.mode {
            RenderMode::CollectionWithTemplate => self.collection_with_template(view, &request, collection)?,
            _ => self.collection_without_template(view, &request, collection)?,
        };

        let spacer = match &request.spacer_template {
            Some(spacer) => {
                let template = self.find_template(view, spacer, &local_names(&request.locals))?;
                Some(template.render(view, &request.locals, None)?)
            }
            None => None,
        };

        let joined = segments
            .iter()
            .map(SafeString::as_str)
            .collect::<Vec<_>>()
            .join(spacer.as_ref().map(SafeString::as_str).unwrap_or(""));
        Ok(Some(SafeString::new(joined)))
    }

    /// One lookup, reused for every element
    fn collection_with_template(
        &self,
        view: &ViewContext,
        request: &RenderRequest,
        collection: &[Value],
    ) -> Result<Vec<SafeString>, RenderError> {
        let (Some(path), Some(binding)) = (&request.path, &request.binding) else {
            return Err(RenderError::MissingPartial);
        };

        let mut locals = request.locals.clone();
        let template = self.find_template(view, path, &required_locals(&locals, binding))?;
        let layout = self.find_layout(view, request)?;
        let _span = tracing::debug_span!(
            "render_collection",
            identifier = template.identifier(),
            count = collection.len()
        )
        .entered();

        let mut segments = Vec::with_capacity(collection.len());
        for (index, element) in collection.iter().enumerate() {
            bind_element(&mut locals, binding, element, index);
            let content = template.render(view, &locals, None)?;
            segments.push(wrap_segment(view, layout.as_deref(), &locals, content)?);
        }
        Ok(segments)
    }

    /// Per-element lookups through a render-scoped cache
    fn collection_without_template(
        &self,
        view: &ViewContext,
        request: &RenderRequest,
        collection: &[Value],
    ) -> Result<Vec<SafeString>, RenderError> {
        let _span = tracing::debug_span!(
            "render_collection",
            identifier = "collection",
            count = collection.len()
        )
        .entered();

        let layout = self.find_layout(view, request)?;
        let mut cache = TemplateCache::new();
        let mut segments = Vec::with_capacity(collection.len());
        let mut last_identifier = None;

        for (index, (element, descriptor)) in collection.iter().zip(&request.elements).enumerate() {
            let mut locals = request.locals.clone();
            let template = cache.fetch(&descriptor.path, || {
                self.find_template(
                    view,
                    &descriptor.path,
                    &required_locals(&locals, &descriptor.binding),
                )
            })?;

            bind_element(&mut locals, &descriptor.binding, element, index);
            let content = template.render(view, &locals, None)?;
            segments.push(wrap_segment(view, layout.as_deref(), &locals, content)?);
            last_identifier = Some(template.identifier().to_string());
        }

        tracing::debug!(
            identifier = last_identifier.as_deref().unwrap_or("collection"),
            templates = cache.len(),
            "rendered heterogeneous collection"
        );
        Ok(segments)
    }
}

fn apply_layout(
    view: &ViewContext,
    layout: &dyn Template,
    locals: &Locals,
    content: SafeString,
) -> Result<SafeString, RenderError> {
    let _span = tracing::debug_span!("render_layout", identifier = layout.identifier()).entered();
    let yield_block = |name: Option<&str>| view.layout_for(name, Some(&content));
    layout.render(view, locals, Some(&yield_block))
}

fn wrap_segment(
    view: &ViewContext,
    layout: Option<&dyn Template>,
    locals: &Locals,
    content: SafeString,
) -> Result<SafeString, RenderError> {
    match layout {
        Some(layout) => apply_layout(view, layout, locals, content),
        None => Ok(content),
    }
}

fn bind_element(locals: &mut Locals, binding: &VariableBinding, element: &Value, index: usize) {
    locals.insert(binding.name.clone(), element.clone());
    if let Some(counter) = &binding.counter {
        locals.insert(counter.clone(), Value::Int(index as i64));
    }
}

fn local_names(locals: &Locals) -> Vec<String> {
    locals.keys().cloned().collect()
}

/// Local names the template will see, sorted and without duplicates
fn required_locals(locals: &Locals, binding: &VariableBinding) -> Vec<String> {
    let mut names = local_names(locals);
    names.extend(binding.names().map(str::to_string));
    names.sort();
    names.dedup();
    names
}
