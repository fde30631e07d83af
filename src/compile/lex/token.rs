use crate::{
    compile::{Keyword, Operator},
    region::Region,
};
use std::fmt::Display;

/// Kinds of [`Token`] emitted by the Lexer.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Kind {
    /// Raw text outside of any tag.
    Content,
    /// Beginning of an expression, `{{` by default.
    ExpressionOpen,
    /// End of an expression, `}}` by default.
    ExpressionClose,
    /// Beginning of a statement, `{%` by default.
    StatementOpen,
    /// End of a statement, `%}` by default.
    StatementClose,
    /// Integer literal.
    Integer,
    /// Floating point literal.
    Float,
    /// Quoted string literal.
    String,
    /// `true` or `false`.
    Boolean,
    /// `null` or `nil`.
    Null,
    /// Unquoted name.
    Identifier,
    /// A reserved word that drives a statement.
    Keyword(Keyword),
    /// Compares two values.
    Operator(Operator),
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// .
    Dot,
    /// :
    Colon,
    /// |
    Pipe,
    /// ||
    Or,
    /// &&
    And,
    /// !
    Bang,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Content => write!(f, "content"),
            Kind::ExpressionOpen => write!(f, "beginning of expression"),
            Kind::ExpressionClose => write!(f, "end of expression"),
            Kind::StatementOpen => write!(f, "beginning of statement"),
            Kind::StatementClose => write!(f, "end of statement"),
            Kind::Integer => write!(f, "integer"),
            Kind::Float => write!(f, "float"),
            Kind::String => write!(f, "string"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Null => write!(f, "null"),
            Kind::Identifier => write!(f, "identifier"),
            Kind::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Kind::Operator(operator) => write!(f, "operator `{operator}`"),
            Kind::LeftParen => write!(f, "`(`"),
            Kind::RightParen => write!(f, "`)`"),
            Kind::LeftBracket => write!(f, "`[`"),
            Kind::RightBracket => write!(f, "`]`"),
            Kind::Comma => write!(f, "`,`"),
            Kind::Dot => write!(f, "`.`"),
            Kind::Colon => write!(f, "`:`"),
            Kind::Pipe => write!(f, "`|`"),
            Kind::Or => write!(f, "`||`"),
            Kind::And => write!(f, "`&&`"),
            Kind::Bang => write!(f, "`!`"),
        }
    }
}

/// The value carried by a literal [`Token`].
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A single lexeme read from the source text.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    /// What the [`Token`] represents.
    pub kind: Kind,
    /// Location of the lexeme within the source text.
    ///
    /// The beginning of the region is the byte offset of the `Token`.
    pub region: Region,
    /// The decoded value of a literal `Token`.
    pub literal: Option<Literal>,
    /// One-based line of the first character.
    pub line: usize,
    /// One-based column of the first character.
    pub column: usize,
}

impl Token {
    /// Return the lexeme exactly as it appears in the source text.
    #[inline]
    pub fn raw<'source>(&self, source: &'source str) -> &'source str {
        self.region.literal(source)
    }

    /// Return true if the [`Token`] is the given [`Keyword`].
    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == Kind::Keyword(keyword)
    }
}
