//! Error types for partial resolution and template rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// Errors that can occur while resolving or rendering a partial
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bound variable name is not a valid identifier
    ///
    /// `partial` is the path or object type that was rendered, `name` the
    /// derived or explicit (`as`) variable name that was rejected.
    #[error(
        "the partial name ({partial}) is not a valid identifier ({name}); make sure it starts \
         with a letter or underscore and is followed by any combination of letters, numbers, \
         or underscores"
    )]
    InvalidIdentifier { partial: String, name: String },

    /// An object was given as a partial but exposes no naming convention
    #[error("'{type_name}' does not expose a model name, so no partial path can be derived from it")]
    NoPartialPath { type_name: String },

    /// The template lookup could not resolve a path
    #[error("missing partial {path} (searched in: {})", format_prefixes(.prefixes))]
    TemplateNotFound { path: String, prefixes: Vec<String> },

    /// Neither a partial nor a layout block was supplied
    #[error("a partial, or a layout with a block, must be given to render")]
    MissingPartial,

    /// A template source failed to parse
    #[error("syntax error in template {identifier}: {error}")]
    Syntax {
        identifier: String,
        source_text: String,
        #[source]
        error: TemplateSyntaxError,
    },

    /// A template file exists but could not be read
    #[error("error reading template file {path}: {message}")]
    Io { path: String, message: String },
}

impl RenderError {
    /// Create a template-not-found error
    pub fn not_found(path: impl Into<String>, prefixes: &[String]) -> Self {
        Self::TemplateNotFound {
            path: path.into(),
            prefixes: prefixes.to_vec(),
        }
    }

    /// Render the error for a terminal, with a source report for syntax errors
    pub fn report(&self) -> String {
        match self {
            Self::Syntax {
                identifier,
                source_text,
                error,
            } => error.format(source_text, identifier),
            other => other.to_string(),
        }
    }
}

fn format_prefixes(prefixes: &[String]) -> String {
    if prefixes.is_empty() {
        "<root>".to_string()
    } else {
        prefixes.join(", ")
    }
}

/// A syntax error inside a `{{ ... }}` tag
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at {span:?}")]
pub struct TemplateSyntaxError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

impl TemplateSyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// Shift the span by `offset` bytes (tags are parsed in isolation)
    pub fn offset(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let expected_str = if self.expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", self.expected.join(", "))
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(format!("{}{}", self.message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_names_partial() {
        let err = RenderError::InvalidIdentifier {
            partial: "users/account".to_string(),
            name: "bad-name".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("(users/account)"));
        assert!(message.contains("(bad-name)"));
    }

    #[test]
    fn test_not_found_lists_prefixes() {
        let err = RenderError::not_found("account", &["users".to_string(), "shared".to_string()]);
        assert!(err.to_string().contains("users, shared"));

        let err = RenderError::not_found("users/account", &[]);
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn test_syntax_offset() {
        let err = TemplateSyntaxError::new(1..3, "unexpected token").offset(10);
        assert_eq!(err.span, 11..13);
    }

    #[test]
    fn test_syntax_report_mentions_file() {
        let err = TemplateSyntaxError::new(3..4, "Unexpected '.'");
        let report = err.format("{{ . }}", "users/_account.html");
        assert!(report.contains("users/_account.html"));
        assert!(report.contains("Unexpected '.'"));
    }
}
