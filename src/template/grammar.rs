//! Template parser: text scanning plus a chumsky grammar for tag bodies

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{Expr, Node, Spanned};
use super::lexer::{lex, Token};
use crate::error::TemplateSyntaxError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Parse template source into nodes
pub fn parse(source: &str) -> Result<Vec<Node>, TemplateSyntaxError> {
    let mut nodes = Vec::new();
    let mut rest = 0;

    while let Some(found) = source[rest..].find(OPEN) {
        let open = rest + found;
        if open > rest {
            nodes.push(Node::Text(source[rest..open].to_string()));
        }

        let body_start = open + OPEN.len();
        let close = source[body_start..]
            .find(CLOSE)
            .map(|idx| body_start + idx)
            .ok_or_else(|| TemplateSyntaxError::new(open..source.len(), "Unclosed tag"))?;

        let expr = parse_tag(&source[body_start..close]).map_err(|e| e.offset(body_start))?;
        nodes.push(Node::Tag(Spanned::new(expr, open..close + CLOSE.len())));
        rest = close + CLOSE.len();
    }

    if rest < source.len() {
        nodes.push(Node::Text(source[rest..].to_string()));
    }

    Ok(nodes)
}

/// Parse the body of a single tag; spans are relative to the body
fn parse_tag(body: &str) -> Result<Expr, TemplateSyntaxError> {
    let len = body.len();

    let tokens = lex(body).map_err(|span| {
        let message = format!("Unexpected character '{}'", &body[span.clone()]);
        TemplateSyntaxError::new(span, message)
    })?;

    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (tok, SimpleSpan::from(span)));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    tag_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => err.into(),
            None => TemplateSyntaxError::new(0..len, "Invalid tag"),
        })
}

fn tag_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => s,
    };

    let yield_expr = just(Token::Yield)
        .ignore_then(identifier.clone().or_not())
        .map(Expr::Yield);

    let literal = select! {
        Token::String(s) => Expr::Literal(s),
    };

    let variable = identifier
        .separated_by(just(Token::Dot))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(Expr::Variable);

    choice((yield_expr, literal, variable)).then_ignore(end())
}

impl<'a> From<Rich<'a, Token>> for TemplateSyntaxError {
    fn from(err: Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of tag".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of tag".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        TemplateSyntaxError {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Yield => "keyword 'yield'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag(expr: Expr, span: std::ops::Range<usize>) -> Node {
        Node::Tag(Spanned::new(expr, span))
    }

    #[test]
    fn test_plain_text() {
        let nodes = parse("<p>hello</p>").expect("should parse");
        assert_eq!(nodes, vec![Node::Text("<p>hello</p>".to_string())]);
    }

    #[test]
    fn test_variable_tag() {
        let nodes = parse("<b>{{ account.name }}</b>").expect("should parse");
        assert_eq!(
            nodes,
            vec![
                Node::Text("<b>".to_string()),
                tag(
                    Expr::Variable(vec!["account".to_string(), "name".to_string()]),
                    3..21
                ),
                Node::Text("</b>".to_string()),
            ]
        );
    }

    #[test]
    fn test_yield_tags() {
        let nodes = parse("{{yield}}{{ yield sidebar }}").expect("should parse");
        assert_eq!(
            nodes,
            vec![
                tag(Expr::Yield(None), 0..9),
                tag(Expr::Yield(Some("sidebar".to_string())), 9..28),
            ]
        );
    }

    #[test]
    fn test_literal_tag() {
        let nodes = parse(r#"{{ "--" }}"#).expect("should parse");
        assert_eq!(nodes, vec![tag(Expr::Literal("--".to_string()), 0..10)]);
    }

    #[test]
    fn test_unclosed_tag() {
        let err = parse("ok {{ user").unwrap_err();
        assert_eq!(err.message, "Unclosed tag");
        assert_eq!(err.span, 3..10);
    }

    #[test]
    fn test_unexpected_character_is_offset() {
        let err = parse("ab{{ user | x }}").unwrap_err();
        assert_eq!(err.span, 10..11);
        assert!(err.message.contains("'|'"));
    }

    #[test]
    fn test_trailing_dot() {
        let err = parse("{{ user. }}").unwrap_err();
        assert!(err.message.starts_with("Unexpected"));
    }

    #[test]
    fn test_empty_tag() {
        assert!(parse("{{ }}").is_err());
    }
}
