mod lex;
mod parse;
mod template;

pub use crate::compile::{
    lex::{token, Lexer},
    parse::{tree, Parser},
    template::Template,
};

use crate::{log::Error, Syntax};
use std::fmt::Display;

/// Compile a [`Template`] from the given text using the given [`Syntax`].
///
/// # Examples
///
/// ```
/// use quill::{compile, Syntax};
///
/// let syntax = Syntax::default();
/// let template = compile("{{ name }}", &syntax);
/// assert!(template.is_ok())
/// ```
///
/// # Errors
///
/// Returns an [`Error`] when the scanner finds a malformed token, or when
/// the tokens do not form a valid program.
pub fn compile<'source>(text: &'source str, syntax: &Syntax) -> Result<Template<'source>, Error> {
    let tokens = Lexer::new(text, syntax).scan()?;

    Parser::new(text, tokens).compile()
}

/// Keywords recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    /// Beginning of an "if" statement.
    If,
    /// Begins another condition in an "if" statement.
    Elif,
    /// Marks the beginning of the else branch in an "if" statement.
    Else,
    /// End of an "if" statement.
    EndIf,
    /// Beginning of a loop.
    For,
    /// Divides the loop variable from the iterable in a loop.
    ///
    /// In this example, the variable is "person" while the iterable
    /// is "people":
    ///
    /// "for person in people"
    In,
    /// End of a loop.
    EndFor,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::If => write!(f, "if"),
            Keyword::Elif => write!(f, "elif"),
            Keyword::Else => write!(f, "else"),
            Keyword::EndIf => write!(f, "endif"),
            Keyword::For => write!(f, "for"),
            Keyword::In => write!(f, "in"),
            Keyword::EndFor => write!(f, "endfor"),
        }
    }
}

/// Comparison operators recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// <
    Lesser,
    /// <=
    LesserOrEqual,
    /// >
    Greater,
    /// >=
    GreaterOrEqual,
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Equal => write!(f, "=="),
            Operator::NotEqual => write!(f, "!="),
            Operator::Lesser => write!(f, "<"),
            Operator::LesserOrEqual => write!(f, "<="),
            Operator::Greater => write!(f, ">"),
            Operator::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// Logical operators that combine two operands.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Logical {
    /// &&
    And,
    /// ||
    Or,
}

impl Display for Logical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Logical::And => write!(f, "&&"),
            Logical::Or => write!(f, "||"),
        }
    }
}
