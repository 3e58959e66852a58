//! Compiled tag-language templates

use super::ast::{Expr, Node};
use super::grammar::parse;
use super::{Template, ViewContext, YieldBlock};
use crate::error::RenderError;
use crate::value::{Locals, SafeString, Value};

/// A template parsed once and rendered many times
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    identifier: String,
    nodes: Vec<Node>,
}

impl CompiledTemplate {
    /// Parse `source`; `identifier` names the template in errors and logs
    pub fn compile(identifier: impl Into<String>, source: &str) -> Result<Self, RenderError> {
        let identifier = identifier.into();
        let nodes = parse(source).map_err(|error| RenderError::Syntax {
            identifier: identifier.clone(),
            source_text: source.to_string(),
            error,
        })?;
        Ok(Self { identifier, nodes })
    }
}

impl Template for CompiledTemplate {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn render(
        &self,
        view: &ViewContext,
        locals: &Locals,
        block: Option<YieldBlock<'_>>,
    ) -> Result<SafeString, RenderError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Tag(tag) => match &tag.node {
                    Expr::Literal(text) => out.push_str(text),
                    Expr::Variable(path) => {
                        if let Some(value) = lookup_variable(locals, path) {
                            out.push_str(&value.to_string());
                        }
                    }
                    Expr::Yield(name) => {
                        let content = match block {
                            Some(block) => block(name.as_deref()),
                            None => view.layout_for(name.as_deref(), None),
                        };
                        out.push_str(content.as_str());
                    }
                },
            }
        }
        Ok(SafeString::new(out))
    }
}

/// Resolve `a.b.c` against the locals; missing names resolve to nothing
fn lookup_variable(locals: &Locals, path: &[String]) -> Option<Value> {
    let (first, fields) = path.split_first()?;
    let mut value = locals.get(first)?.clone();
    for field in fields {
        value = value.get(field)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use pretty_assertions::assert_eq;

    fn render(source: &str, locals: &Locals) -> String {
        CompiledTemplate::compile("test", source)
            .expect("should compile")
            .render(&ViewContext::default(), locals, None)
            .expect("should render")
            .into_string()
    }

    #[test]
    fn test_renders_fields() {
        let mut locals = Locals::new();
        locals.insert(
            "account".to_string(),
            Record::new("Account").with_field("name", "ada").into(),
        );
        assert_eq!(render("<p>{{ account.name }}</p>", &locals), "<p>ada</p>");
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        assert_eq!(render("[{{ nobody.name }}]", &Locals::new()), "[]");
    }

    #[test]
    fn test_yield_uses_block() {
        let template = CompiledTemplate::compile("layout", "<div>{{ yield }}</div>").expect("should compile");
        let block = |_: Option<&str>| SafeString::from("inner");
        let out = template
            .render(&ViewContext::default(), &Locals::new(), Some(&block))
            .expect("should render");
        assert_eq!(out.as_str(), "<div>inner</div>");
    }

    #[test]
    fn test_yield_without_block_reads_content_for() {
        let view = ViewContext::default().with_content_for("sidebar", "links");
        let template = CompiledTemplate::compile("layout", "{{ yield sidebar }}|{{ yield }}").expect("should compile");
        let out = template
            .render(&view, &Locals::new(), None)
            .expect("should render");
        assert_eq!(out.as_str(), "links|");
    }

    #[test]
    fn test_compile_error_keeps_source() {
        let err = CompiledTemplate::compile("users/_account", "{{ user | x }}").unwrap_err();
        match err {
            RenderError::Syntax {
                identifier,
                source_text,
                ..
            } => {
                assert_eq!(identifier, "users/_account");
                assert_eq!(source_text, "{{ user | x }}");
            }
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }
}
