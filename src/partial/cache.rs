//! Render-scoped template memo for heterogeneous collections

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RenderError;
use crate::template::Template;

/// Path to template memo; lives for a single render call
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: HashMap<String, Arc<dyn Template>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached template for `path`, or look it up and remember it
    pub fn fetch<F>(&mut self, path: &str, lookup: F) -> Result<Arc<dyn Template>, RenderError>
    where
        F: FnOnce() -> Result<Arc<dyn Template>, RenderError>,
    {
        if let Some(template) = self.entries.get(path) {
            tracing::trace!(path, "template cache hit");
            return Ok(template.clone());
        }
        let template = lookup()?;
        self.entries.insert(path.to_string(), template.clone());
        Ok(template)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::CompiledTemplate;

    fn compiled(identifier: &str) -> Result<Arc<dyn Template>, RenderError> {
        Ok(Arc::new(CompiledTemplate::compile(identifier, "x")?))
    }

    #[test]
    fn test_fetch_populates_once() {
        let mut cache = TemplateCache::new();
        let mut lookups = 0;

        for path in ["a", "b", "a", "c", "a"] {
            cache
                .fetch(path, || {
                    lookups += 1;
                    compiled(path)
                })
                .expect("should fetch");
        }

        assert_eq!(lookups, 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_failed_lookup_is_not_cached() {
        let mut cache = TemplateCache::new();
        let result = cache.fetch("missing", || Err(RenderError::not_found("missing", &[])));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
