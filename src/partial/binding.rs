//! Local variable names a partial's object is bound to

use std::sync::LazyLock;

use regex::Regex;

/// Trailing word run, skipping a leading underscore and dotted suffixes
static DEFAULT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_?([A-Za-z0-9_]+)(?:\.[A-Za-z0-9_]+)*\z").expect("valid regex"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*\z").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub name: String,
    /// `<name>_counter`, present only when rendering a collection
    pub counter: Option<String>,
}

impl VariableBinding {
    /// Derive the binding for `path`; an explicit name always wins
    pub fn bind(path: &str, explicit: Option<&str>, collection: bool) -> Self {
        let name = match explicit {
            Some(name) => name.to_string(),
            None => default_variable_name(path).unwrap_or_default().to_string(),
        };
        let counter = collection.then(|| format!("{}_counter", name));
        Self { name, counter }
    }

    pub fn is_valid(&self) -> bool {
        is_identifier(&self.name)
    }

    /// Names this binding adds to the locals
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.counter.as_deref())
    }
}

/// `users/_account.html` becomes `account`
pub fn default_variable_name(path: &str) -> Option<&str> {
    DEFAULT_NAME
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Letter or underscore, then letters, digits or underscores
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_strips_underscore_and_extension() {
        assert_eq!(default_variable_name("users/_account.html"), Some("account"));
        assert_eq!(default_variable_name("users/account"), Some("account"));
        assert_eq!(default_variable_name("_account"), Some("account"));
        assert_eq!(default_variable_name("account.html.erb"), Some("account"));
    }

    #[test]
    fn test_default_name_with_embedded_dots_takes_first_run() {
        assert_eq!(default_variable_name("foo.bar.baz"), Some("foo"));
        assert_eq!(default_variable_name("shared/foo.bar.baz"), Some("foo"));
    }

    #[test]
    fn test_default_name_keeps_digits() {
        assert_eq!(default_variable_name("123bad"), Some("123bad"));
        assert_eq!(default_variable_name("users/"), None);
    }

    #[test]
    fn test_bind_single() {
        let binding = VariableBinding::bind("users/account", None, false);
        assert_eq!(binding.name, "account");
        assert_eq!(binding.counter, None);
        assert_eq!(binding.names().collect::<Vec<_>>(), vec!["account"]);
    }

    #[test]
    fn test_bind_collection_with_override() {
        let binding = VariableBinding::bind("users/account", Some("member"), true);
        assert_eq!(binding.name, "member");
        assert_eq!(binding.counter.as_deref(), Some("member_counter"));
        assert_eq!(
            binding.names().collect::<Vec<_>>(),
            vec!["member", "member_counter"]
        );
    }

    #[test]
    fn test_identifier_rule() {
        assert!(is_identifier("account"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("Account2"));
        assert!(!is_identifier("123bad"));
        assert!(!is_identifier("bad-name"));
        assert!(!is_identifier(""));
        assert!(!VariableBinding::bind("users/", None, false).is_valid());
    }
}
