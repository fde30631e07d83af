pub mod token;

mod number;
mod sequence;
mod state;
mod string;

use self::{
    number::NumberState,
    sequence::Sequence,
    state::CursorState,
    string::StringState,
    token::{Kind, Literal, Token},
};
use crate::{
    compile::{Keyword, Operator},
    log::{unexpected_token, Error},
    Marker, Syntax,
};

/// Provides methods to read a source string as [`Token`] instances.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Markers that open and close tags.
    syntax: &'source Syntax,
    /// Tracks the [`Lexer`] state and determines the action taken
    /// when `.next` is called.
    state: CursorState,
    /// One-based line of the cursor.
    line: usize,
    /// One-based column of the cursor, counted in characters.
    column: usize,
    /// Matches the beginning of an expression while reading content.
    expression: Sequence,
    /// Matches the beginning of a statement while reading content.
    statement: Sequence,
    /// Temporary storage for a [`Token`] that will be returned
    /// on the following call to `.next`.
    buffer: Option<Token>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: &'source Syntax) -> Self {
        Self {
            source,
            cursor: 0,
            syntax,
            state: CursorState::Default,
            line: 1,
            column: 1,
            expression: Sequence::new(syntax.get(Marker::BeginExpression)),
            statement: Sequence::new(syntax.get(Marker::BeginStatement)),
            buffer: None,
        }
    }

    /// Read the entire source text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a malformed token is found.
    #[tracing::instrument(level = "debug", skip_all, fields(length = self.source.len()))]
    pub fn scan(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = vec![];
        while let Some(token) = self.next()? {
            tokens.push(token);
        }
        tracing::trace!(count = tokens.len(), "scanned template");

        Ok(tokens)
    }

    /// Return the next [`Token`].
    ///
    /// Whitespace within tags is skipped.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a malformed token is found.
    pub fn next(&mut self) -> Result<Option<Token>, Error> {
        // Always prefer taking from the buffer when possible.
        if let Some(token) = self.buffer.take() {
            return Ok(Some(token));
        }
        if self.cursor >= self.source.len() {
            return Ok(None);
        }

        match self.state {
            CursorState::Default => Ok(Some(self.lex_default())),
            CursorState::Expression | CursorState::Statement => self.lex_tag(),
        }
    }

    /// Return the next [`Token`] in [`CursorState::Default`] configuration.
    ///
    /// Both opening markers are matched in parallel, one character at a time.
    /// When the expression and statement markers complete on the same
    /// character, the expression wins.
    fn lex_default(&mut self) -> Token {
        let source = self.source;
        let from = self.cursor;
        let (line, column) = (self.line, self.column);
        self.expression.reset();
        self.statement.reset();

        for (offset, c) in source[from..].char_indices() {
            self.step(c);

            let expression = self.expression.feed(c);
            let statement = self.statement.feed(c);
            let (marker, kind, state, length) = if expression {
                (
                    Marker::BeginExpression,
                    Kind::ExpressionOpen,
                    CursorState::Expression,
                    self.expression.len(),
                )
            } else if statement {
                (
                    Marker::BeginStatement,
                    Kind::StatementOpen,
                    CursorState::Statement,
                    self.statement.len(),
                )
            } else {
                continue;
            };

            let end = from + offset + c.len_utf8();
            let begin = end - self.syntax.get(marker).len();
            self.cursor = end;
            self.state = state;

            let open = Token {
                kind,
                region: (begin..end).into(),
                literal: None,
                line: self.line,
                column: self.column - length,
            };
            if begin == from {
                return open;
            }
            self.buffer = Some(open);

            return Token {
                kind: Kind::Content,
                region: (from..begin).into(),
                literal: None,
                line,
                column,
            };
        }

        self.cursor = source.len();

        Token {
            kind: Kind::Content,
            region: (from..source.len()).into(),
            literal: None,
            line,
            column,
        }
    }

    /// Return the next [`Token`] inside of an expression or statement.
    ///
    /// Returns `None` if the source ends before the tag is closed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a malformed token is found.
    fn lex_tag(&mut self) -> Result<Option<Token>, Error> {
        let source = self.source;

        while let Some(c) = source[self.cursor..].chars().next() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.step(c);
                self.cursor += 1;
                continue;
            }
            if let Some((marker, kind)) = self.state.close() {
                let close = self.syntax.get(marker);
                if source[self.cursor..].starts_with(close) {
                    let token = self.emit(kind, close.len(), None);
                    self.state = CursorState::Default;

                    return Ok(Some(token));
                }
            }

            return self.lex_token(c).map(Some);
        }

        Ok(None)
    }

    /// Return a single structural, literal or identifier [`Token`] beginning
    /// with the given character.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character is found.
    fn lex_token(&mut self, c: char) -> Result<Token, Error> {
        let next = self.source[self.cursor + c.len_utf8()..].chars().next();

        let token = match (c, next) {
            ('"' | '\'', _) => return self.lex_string(c),
            ('(', _) => self.emit(Kind::LeftParen, 1, None),
            (')', _) => self.emit(Kind::RightParen, 1, None),
            ('[', _) => self.emit(Kind::LeftBracket, 1, None),
            (']', _) => self.emit(Kind::RightBracket, 1, None),
            (',', _) => self.emit(Kind::Comma, 1, None),
            (':', _) => self.emit(Kind::Colon, 1, None),
            ('.', Some('0'..='9')) => return self.lex_number(NumberState::DecimalBegin),
            ('.', _) => self.emit(Kind::Dot, 1, None),
            ('&', Some('&')) => self.emit(Kind::And, 2, None),
            ('|', Some('|')) => self.emit(Kind::Or, 2, None),
            ('|', _) => self.emit(Kind::Pipe, 1, None),
            ('!', Some('=')) => self.emit(Kind::Operator(Operator::NotEqual), 2, None),
            ('!', _) => self.emit(Kind::Bang, 1, None),
            ('=', Some('=')) => self.emit(Kind::Operator(Operator::Equal), 2, None),
            ('<', Some('=')) => self.emit(Kind::Operator(Operator::LesserOrEqual), 2, None),
            ('<', _) => self.emit(Kind::Operator(Operator::Lesser), 1, None),
            ('>', Some('=')) => self.emit(Kind::Operator(Operator::GreaterOrEqual), 2, None),
            ('>', _) => self.emit(Kind::Operator(Operator::Greater), 1, None),
            ('&', _) => return Err(self.unexpected(c, "did you mean `&&`?")),
            ('=', _) => return Err(self.unexpected(c, "did you mean `==`?")),
            (c, _) => match NumberState::start(c) {
                Some(state) => return self.lex_number(state),
                None if c.is_ascii_alphabetic() || c == '_' => self.lex_word(),
                None => {
                    return Err(self.unexpected(
                        c,
                        "expected an identifier, a literal, an operator, or the end of the tag",
                    ))
                }
            },
        };

        Ok(token)
    }

    /// Return a [`Token`] containing an identifier, keyword, boolean or null.
    fn lex_word(&mut self) -> Token {
        let source = self.source;
        let rest = &source[self.cursor..];
        let length = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());

        let (kind, literal) = match &rest[..length] {
            "if" => (Kind::Keyword(Keyword::If), None),
            "elif" => (Kind::Keyword(Keyword::Elif), None),
            "else" => (Kind::Keyword(Keyword::Else), None),
            "endif" => (Kind::Keyword(Keyword::EndIf), None),
            "for" => (Kind::Keyword(Keyword::For), None),
            "in" => (Kind::Keyword(Keyword::In), None),
            "endfor" => (Kind::Keyword(Keyword::EndFor), None),
            "true" => (Kind::Boolean, Some(Literal::Boolean(true))),
            "false" => (Kind::Boolean, Some(Literal::Boolean(false))),
            "null" | "nil" => (Kind::Null, Some(Literal::Null)),
            _ => (Kind::Identifier, None),
        };

        self.emit(kind, length, literal)
    }

    /// Return a [`Token`] containing an integer or float, beginning in the
    /// given [`NumberState`].
    ///
    /// A number that ends with a bare `.` does not include it, so `5.` is
    /// read as the integer `5` followed by a `.`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the number ends with an incomplete exponent
    /// or hexadecimal prefix, or cannot be represented.
    fn lex_number(&mut self, mut state: NumberState) -> Result<Token, Error> {
        let source = self.source;
        let from = self.cursor;
        let mut end = source.len();

        // The first character is always a one byte digit or `.`.
        for (offset, c) in source[from + 1..].char_indices() {
            match state.next(c) {
                NumberState::Done => {
                    end = from + 1 + offset;
                    break;
                }
                next => state = next,
            }
        }

        let literal = match state {
            NumberState::Zero | NumberState::Integer => parse_integer(&source[from..end], 10),
            NumberState::DecimalBegin => {
                end -= 1;
                parse_integer(&source[from..end], 10)
            }
            NumberState::Decimal | NumberState::Exponent => {
                source[from..end].parse().ok().map(Literal::Float)
            }
            NumberState::Hex => parse_integer(&source[from + 2..end], 16),
            _ => None,
        };

        match literal {
            Some(literal) => {
                let kind = match literal {
                    Literal::Float(_) => Kind::Float,
                    _ => Kind::Integer,
                };

                Ok(self.emit(kind, end - from, Some(literal)))
            }
            None => {
                let help = if state.is_incomplete() {
                    "an exponent or hexadecimal prefix must be followed by digits"
                } else {
                    "this number cannot be represented"
                };

                Err(Error::syntax(format!("malformed number \"{}\"", &source[from..end]))
                    .with_pointer(source, from..end)
                    .with_help(help))
            }
        }
    }

    /// Return a [`Token`] containing a string delimited by the given quote.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the source ends before the string is closed.
    fn lex_string(&mut self, quote: char) -> Result<Token, Error> {
        let source = self.source;
        let from = self.cursor;
        let mut state = StringState::Begin;
        let mut value = String::new();

        for (offset, c) in source[from + 1..].char_indices() {
            let (next, push) = state.next(c, quote);
            state = next;
            value.extend(push);

            if state == StringState::Done {
                let end = from + 1 + offset + c.len_utf8();

                return Ok(self.emit(Kind::String, end - from, Some(Literal::String(value))));
            }
        }

        Err(Error::syntax("unterminated string")
            .with_pointer(source, from..source.len())
            .with_help(format!("close the string with `{quote}`")))
    }

    /// Create a [`Token`] at the cursor spanning the given amount of bytes,
    /// and move the cursor past it.
    fn emit(&mut self, kind: Kind, length: usize, literal: Option<Literal>) -> Token {
        let source = self.source;
        let from = self.cursor;
        let token = Token {
            kind,
            region: (from..from + length).into(),
            literal,
            line: self.line,
            column: self.column,
        };

        for c in source[from..from + length].chars() {
            self.step(c);
        }
        self.cursor = from + length;

        token
    }

    /// Move the line and column past the given character.
    fn step(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Return an [`Error`] pointing at the given character under the cursor.
    fn unexpected(&self, c: char, help: &str) -> Error {
        Error::syntax(unexpected_token(c))
            .with_pointer(self.source, self.cursor..self.cursor + c.len_utf8())
            .with_help(help)
    }
}

/// Parse an integer [`Literal`] in the given radix.
///
/// Decimal integers too large for an `i64` become floats.
fn parse_integer(text: &str, radix: u32) -> Option<Literal> {
    match i64::from_str_radix(text, radix) {
        Ok(integer) => Some(Literal::Integer(integer)),
        Err(_) if radix == 10 => text.parse().ok().map(Literal::Float),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        token::{Kind, Literal, Token},
        Lexer,
    };
    use crate::{
        compile::{Keyword, Operator},
        log::ErrorKind,
        Builder, Syntax,
    };
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<(Kind, &str)> {
        let syntax = Syntax::default();
        Lexer::new(source, &syntax)
            .scan()
            .unwrap()
            .into_iter()
            .map(|token| (token.kind, token.raw(source)))
            .collect()
    }

    fn literals(source: &str) -> Vec<Literal> {
        let syntax = Syntax::default();
        Lexer::new(source, &syntax)
            .scan()
            .unwrap()
            .into_iter()
            .filter_map(|token| token.literal)
            .collect()
    }

    #[test]
    fn test_lex_content_only() {
        assert_eq!(kinds("lorem ipsum"), vec![(Kind::Content, "lorem ipsum")]);
        assert_eq!(kinds(""), vec![]);
    }

    #[test]
    fn test_lex_expression() {
        assert_eq!(
            kinds("hello {{ name }}!"),
            vec![
                (Kind::Content, "hello "),
                (Kind::ExpressionOpen, "{{"),
                (Kind::Identifier, "name"),
                (Kind::ExpressionClose, "}}"),
                (Kind::Content, "!"),
            ]
        );
    }

    #[test]
    fn test_lex_statement() {
        assert_eq!(
            kinds("{% for item in items %}{{item}}{% endfor %}"),
            vec![
                (Kind::StatementOpen, "{%"),
                (Kind::Keyword(Keyword::For), "for"),
                (Kind::Identifier, "item"),
                (Kind::Keyword(Keyword::In), "in"),
                (Kind::Identifier, "items"),
                (Kind::StatementClose, "%}"),
                (Kind::ExpressionOpen, "{{"),
                (Kind::Identifier, "item"),
                (Kind::ExpressionClose, "}}"),
                (Kind::StatementOpen, "{%"),
                (Kind::Keyword(Keyword::EndFor), "endfor"),
                (Kind::StatementClose, "%}"),
            ]
        );
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("{{ !a == b != c < d <= e > f >= g && h || i | j: k, l }}")
                .into_iter()
                .map(|(kind, _)| kind)
                .filter(|kind| *kind != Kind::Identifier)
                .collect::<Vec<_>>(),
            vec![
                Kind::ExpressionOpen,
                Kind::Bang,
                Kind::Operator(Operator::Equal),
                Kind::Operator(Operator::NotEqual),
                Kind::Operator(Operator::Lesser),
                Kind::Operator(Operator::LesserOrEqual),
                Kind::Operator(Operator::Greater),
                Kind::Operator(Operator::GreaterOrEqual),
                Kind::And,
                Kind::Or,
                Kind::Pipe,
                Kind::Colon,
                Kind::Comma,
                Kind::ExpressionClose,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            literals("{{ 10 0 3.14 .5 1e3 2.5E-2 0xFF }}"),
            vec![
                Literal::Integer(10),
                Literal::Integer(0),
                Literal::Float(3.14),
                Literal::Float(0.5),
                Literal::Float(1000.0),
                Literal::Float(0.025),
                Literal::Integer(255),
            ]
        );
    }

    #[test]
    fn test_lex_trailing_dot_backtracks() {
        assert_eq!(
            kinds("{{ 5.name }}"),
            vec![
                (Kind::ExpressionOpen, "{{"),
                (Kind::Integer, "5"),
                (Kind::Dot, "."),
                (Kind::Identifier, "name"),
                (Kind::ExpressionClose, "}}"),
            ]
        );
    }

    #[test]
    fn test_lex_malformed_number() {
        let syntax = Syntax::default();
        let error = Lexer::new("{{ 1e }}", &syntax).scan().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.to_string().starts_with("Syntax error: malformed number \"1e\""));
    }

    #[test]
    fn test_lex_strings() {
        assert_eq!(
            literals(r#"{{ "a\"b" 'it\'s' "tab\there" }}"#),
            vec![
                Literal::String("a\"b".into()),
                Literal::String("it's".into()),
                Literal::String("tab\there".into()),
            ]
        );
    }

    #[test]
    fn test_lex_unterminated_string() {
        let syntax = Syntax::default();
        let error = Lexer::new("{{ \"unterminated }}", &syntax).scan().unwrap_err();

        assert!(error.to_string().starts_with("Syntax error"));
        assert_eq!(error.column(), Some(4));
    }

    #[test]
    fn test_lex_words() {
        assert_eq!(
            literals("{{ true false null nil }}"),
            vec![
                Literal::Boolean(true),
                Literal::Boolean(false),
                Literal::Null,
                Literal::Null,
            ]
        );
        assert_eq!(kinds("{{ iffy }}")[1], (Kind::Identifier, "iffy"));
    }

    #[test]
    fn test_lex_unexpected_character() {
        let syntax = Syntax::default();

        for source in ["{{ a = b }}", "{{ a & b }}", "{{ @ }}"] {
            let error = Lexer::new(source, &syntax).scan().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Syntax);
        }
    }

    #[test]
    fn test_lex_line_and_column() {
        let syntax = Syntax::default();
        let tokens: Vec<Token> = Lexer::new("one\n  {{\n name }}", &syntax).scan().unwrap();

        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (3, 2));
        assert_eq!((tokens[3].line, tokens[3].column), (3, 7));
    }

    #[test]
    fn test_lex_unclosed_tag_ends() {
        assert_eq!(
            kinds("{{ var1"),
            vec![(Kind::ExpressionOpen, "{{"), (Kind::Identifier, "var1")]
        );
    }

    #[test]
    fn test_lex_custom_syntax() {
        let syntax = Builder::new()
            .with_expression("<<", ">>")
            .with_statement("<%", "%>")
            .to_syntax()
            .unwrap();
        let source = "a << b >> <% if c %>";
        let tokens = Lexer::new(source, &syntax).scan().unwrap();

        assert_eq!(
            tokens.iter().map(|t| t.raw(source)).collect::<Vec<_>>(),
            vec!["a ", "<<", "b", ">>", " ", "<%", "if", "c", "%>"]
        );
    }

    #[test]
    fn test_lex_raw_reproduces_source() {
        let source = "x {{ 'y' | z: 1.50 }} w";
        let syntax = Syntax::default();
        for token in Lexer::new(source, &syntax).scan().unwrap() {
            assert_eq!(&source[token.region.begin..token.region.end], token.raw(source));
        }
        assert_eq!(kinds(source)[2], (Kind::String, "'y'"));
    }
}
