//! Object to partial path resolution, memoized per search scope and type

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::RenderError;
use crate::naming::ModelName;
use crate::value::Value;

/// Process-wide memo of derived partial paths
///
/// Keyed by search scope (the current search prefix, or the root scope when
/// paths are not namespace-qualified), then by runtime type name. Entries are never evicted. Concurrent misses for the same key both
/// compute the same path, so the last writer wins harmlessly.
#[derive(Debug, Default)]
pub struct PartialPathCache {
    scopes: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl PartialPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &str, type_name: &str) -> Option<String> {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.get(scope)?.get(type_name).cloned()
    }

    pub fn insert(&self, scope: &str, type_name: &str, path: &str) {
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        scopes
            .entry(scope.to_string())
            .or_default()
            .insert(type_name.to_string(), path.to_string());
    }

    /// Number of memoized paths across all scopes
    pub fn len(&self) -> usize {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves objects to partial paths within one search scope
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    cache: &'a PartialPathCache,
    prefix: &'a str,
    namespaced: bool,
}

impl<'a> PathResolver<'a> {
    pub fn new(cache: &'a PartialPathCache, prefix: &'a str, namespaced: bool) -> Self {
        Self {
            cache,
            prefix,
            namespaced,
        }
    }

    /// Memo bucket; unqualified paths never depend on the prefix, so they all
    /// share the root scope
    fn scope(&self) -> &'a str {
        if self.namespaced {
            self.prefix
        } else {
            ""
        }
    }

    /// Conventional partial path for `object`
    pub fn resolve(&self, object: &Value) -> Result<String, RenderError> {
        let type_name = object.type_name();
        let scope = self.scope();
        if let Some(path) = self.cache.get(scope, type_name) {
            tracing::trace!(type_name, scope, %path, "partial path memo hit");
            return Ok(path);
        }

        let model_name = model_name_of(object)?;
        let path = if self.namespaced {
            qualify(self.prefix, model_name.partial_path())
        } else {
            model_name.partial_path().to_string()
        };

        tracing::debug!(type_name, scope, %path, "derived partial path");
        self.cache.insert(scope, type_name, &path);
        Ok(path)
    }
}

/// Naming capability of the object, or of the model it adapts to
fn model_name_of(object: &Value) -> Result<ModelName, RenderError> {
    let no_path = || RenderError::NoPartialPath {
        type_name: object.type_name().to_string(),
    };
    let Value::Object(inner) = object else {
        return Err(no_path());
    };
    let model_name = match inner.to_model() {
        Some(Value::Object(model)) => model.model_name(),
        Some(_) => None,
        None => inner.model_name(),
    };
    model_name.ok_or_else(no_path)
}

/// Place a nested object path under the directory of the current prefix,
/// so `admin/users` renders a `posts/post` object as `admin/posts/post`
fn qualify(prefix: &str, partial_path: &str) -> String {
    match prefix.rsplit_once('/') {
        Some((dir, _)) if partial_path.contains('/') => format!("{}/{}", dir, partial_path),
        _ => partial_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Record};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Counted {
        calls: Arc<AtomicUsize>,
    }

    impl Object for Counted {
        fn type_name(&self) -> &str {
            "Widget"
        }

        fn model_name(&self) -> Option<ModelName> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(ModelName::new("Widget"))
        }
    }

    #[test]
    fn test_resolve_simple() {
        let cache = PartialPathCache::new();
        let resolver = PathResolver::new(&cache, "", true);
        let user = Value::from(Record::new("User"));
        assert_eq!(resolver.resolve(&user).expect("resolves"), "users/user");
    }

    #[test]
    fn test_memoized_per_type_and_scope() {
        let cache = PartialPathCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let a = Value::object(Counted { calls: calls.clone() });
        let b = Value::object(Counted { calls: calls.clone() });

        let resolver = PathResolver::new(&cache, "widgets", true);
        assert_eq!(resolver.resolve(&a).expect("resolves"), "widgets/widget");
        assert_eq!(resolver.resolve(&b).expect("resolves"), "widgets/widget");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A different scope computes its own entry
        let other = PathResolver::new(&cache, "admin/dashboard", true);
        assert_eq!(other.resolve(&a).expect("resolves"), "admin/widgets/widget");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_namespace_qualification() {
        assert_eq!(qualify("admin/users", "posts/post"), "admin/posts/post");
        assert_eq!(qualify("users", "posts/post"), "posts/post");
        assert_eq!(qualify("admin/users", "post"), "post");
        assert_eq!(qualify("", "posts/post"), "posts/post");
    }

    #[test]
    fn test_namespace_qualification_disabled() {
        let cache = PartialPathCache::new();
        let resolver = PathResolver::new(&cache, "admin/users", false);
        let post = Value::from(Record::new("Post"));
        assert_eq!(resolver.resolve(&post).expect("resolves"), "posts/post");
    }

    #[test]
    fn test_shared_memo_keeps_qualification_settings_apart() {
        let cache = PartialPathCache::new();
        let post = Value::from(Record::new("Post"));

        let qualified = PathResolver::new(&cache, "admin/users", true);
        let plain = PathResolver::new(&cache, "admin/users", false);
        assert_eq!(qualified.resolve(&post).expect("resolves"), "admin/posts/post");
        assert_eq!(plain.resolve(&post).expect("resolves"), "posts/post");
        assert_eq!(qualified.resolve(&post).expect("resolves"), "admin/posts/post");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_to_model_delegates_naming() {
        let cache = PartialPathCache::new();
        let resolver = PathResolver::new(&cache, "", true);
        let presenter = Value::from(Record::plain("UserPresenter").with_to_model(Record::new("User")));
        assert_eq!(resolver.resolve(&presenter).expect("resolves"), "users/user");
    }

    #[test]
    fn test_no_naming_capability() {
        let cache = PartialPathCache::new();
        let resolver = PathResolver::new(&cache, "", true);

        let result = resolver.resolve(&Value::from(Record::plain("Blob")));
        assert!(matches!(
            result,
            Err(RenderError::NoPartialPath { ref type_name }) if type_name == "Blob"
        ));

        let result = resolver.resolve(&Value::from("text"));
        assert!(matches!(result, Err(RenderError::NoPartialPath { .. })));
        assert!(cache.is_empty());
    }
}
