//! Naming convention mapping a type name to its default partial path
//!
//! `Admin::BlogPost` becomes element `blog_post`, collection `admin/blog_posts`
//! and partial path `admin/blog_posts/blog_post`.

use std::sync::LazyLock;

use regex::Regex;

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid regex"));
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// Names derived from a type name by convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    name: String,
    singular: String,
    plural: String,
    element: String,
    collection: String,
    partial_path: String,
}

impl ModelName {
    /// Derive every name from a `::`-namespaced type name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let underscored = underscore(&name);
        let singular = underscored.replace('/', "_");
        let plural = pluralize(&singular);
        let element = underscore(demodulize(&name));
        let collection = pluralize(&underscored);
        let partial_path = format!("{}/{}", collection, element);

        Self {
            name,
            singular,
            plural,
            element,
            collection,
            partial_path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Conventional partial path, e.g. `users/user`
    pub fn partial_path(&self) -> &str {
        &self.partial_path
    }
}

/// Convert `Admin::BlogPost` to `admin/blog_post`
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// Strip the namespace: `Admin::BlogPost` to `BlogPost`
pub fn demodulize(word: &str) -> &str {
    match word.rfind("::") {
        Some(idx) => &word[idx + 2..],
        None => word,
    }
}

/// Pluralize the last word of an underscored name
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.ends_with("ss")
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("User"), "user");
        assert_eq!(underscore("BlogPost"), "blog_post");
        assert_eq!(underscore("Admin::BlogPost"), "admin/blog_post");
        assert_eq!(underscore("HTMLParser"), "html_parser");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("branch"), "branches");
    }

    #[test]
    fn test_model_name_simple() {
        let name = ModelName::new("User");
        assert_eq!(name.element(), "user");
        assert_eq!(name.collection(), "users");
        assert_eq!(name.partial_path(), "users/user");
    }

    #[test]
    fn test_model_name_namespaced() {
        let name = ModelName::new("Admin::BlogPost");
        assert_eq!(name.singular(), "admin_blog_post");
        assert_eq!(name.plural(), "admin_blog_posts");
        assert_eq!(name.element(), "blog_post");
        assert_eq!(name.collection(), "admin/blog_posts");
        assert_eq!(name.partial_path(), "admin/blog_posts/blog_post");
    }
}
