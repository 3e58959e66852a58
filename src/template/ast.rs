//! AST for the partial tag language

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A piece of template source
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text copied to the output
    Text(String),
    /// A `{{ ... }}` tag
    Tag(Spanned<Expr>),
}

/// The expression inside a tag
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `user.name`: a local followed by field accesses
    Variable(Vec<String>),
    /// `"text"`
    Literal(String),
    /// `yield` or `yield sidebar`
    Yield(Option<String>),
}
