//! Quill parser.
//!
//! Consumes the tokens produced by a Lexer and constructs a new Template
//! containing the Abstract Syntax Tree. Statements are parsed by recursive
//! descent and expressions by precedence climbing, loosest first:
//!
//! ```text
//! application := disjunction ( "|" disjunction ( ":" disjunction ( "," disjunction )* )? )*
//! disjunction := conjunction ( "||" conjunction )*
//! conjunction := comparison ( "&&" comparison )*
//! comparison  := unary ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" ) unary )*
//! unary       := "!" unary | access
//! access      := primary ( "." primary )*
//! primary     := literal | identifier | "(" application ")" | "[" ( application ( "," application )* ","? )? "]"
//! ```
pub mod tree;

use crate::{
    compile::{
        token::{Kind, Token},
        tree::{
            Alternate, Array, Block, Call, Combine, Compare, Constant, Expression, ForLoop,
            Identifier, IfElse, Member, Not, Output, Program, Statement,
        },
        Keyword, Logical, Template,
    },
    log::{expected_eof, expected_found, Error},
    region::Region,
};
use std::fmt::Display;

pub struct Parser<'source> {
    /// Text the tokens were read from.
    source: &'source str,
    /// Every token in the source, in order.
    tokens: Vec<Token>,
    /// Position of the next token.
    index: usize,
}

impl<'source> Parser<'source> {
    /// Create a new Parser over the given tokens.
    #[inline]
    pub fn new(source: &'source str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            index: 0,
        }
    }

    /// Compile the template.
    ///
    /// Every token must belong to a statement, so trailing input is rejected.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the tokens violate the grammar.
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = self.tokens.len()))]
    pub fn compile(mut self) -> Result<Template<'source>, Error> {
        let mut statements = vec![];
        while self.peek().is_some() {
            statements.push(self.parse_statement()?);
        }

        Ok(Template {
            program: Program { statements },
            source: self.source,
        })
    }

    /// Parse a single piece of content, expression or statement.
    fn parse_statement(&mut self) -> Result<Statement, Error> {
        let expected = "content, an expression or a statement";
        let token = self.next_must(expected)?;

        match token.kind {
            Kind::Content => Ok(Statement::Content(token.region)),
            Kind::ExpressionOpen => {
                let expression = self.parse_expression()?;
                let close = self.expect(Kind::ExpressionClose)?;

                Ok(Statement::Output(Output {
                    expression,
                    region: token.region.combine(close.region),
                }))
            }
            Kind::StatementOpen => {
                let keyword = self.next_must("`if` or `for`")?;

                match keyword.kind {
                    Kind::Keyword(Keyword::If) => {
                        self.parse_if(token.region).map(Statement::IfElse)
                    }
                    Kind::Keyword(Keyword::For) => {
                        self.parse_for(token.region).map(Statement::ForLoop)
                    }
                    _ => Err(self.unexpected(&keyword, "`if` or `for`")),
                }
            }
            _ => Err(self.unexpected(&token, expected)),
        }
    }

    /// Parse the remainder of an "if" statement, after the `if` or `elif`
    /// keyword.
    ///
    /// An `elif` is parsed as a nested [`IfElse`] in the else branch, which
    /// consumes the `endif` for the entire chain.
    fn parse_if(&mut self, begin: Region) -> Result<IfElse, Error> {
        // {% if name == "taylor" %}
        //   Welcome back, Taylor.
        // {% elif name %}
        //   Welcome back.
        // {% endif %}
        let condition = self.parse_expression()?;
        self.expect(Kind::StatementClose)?;
        let then_branch = self.parse_block(&[Keyword::Elif, Keyword::Else, Keyword::EndIf])?;

        let keyword = self.next_must("`elif`, `else` or `endif`")?;
        let (else_branch, end) = match keyword.kind {
            Kind::Keyword(Keyword::Elif) => {
                let nested = self.parse_if(keyword.region)?;
                let end = nested.region;

                (Some(Alternate::ElseIf(Box::new(nested))), end)
            }
            Kind::Keyword(Keyword::Else) => {
                self.expect(Kind::StatementClose)?;
                let block = self.parse_block(&[Keyword::EndIf])?;
                self.expect(Kind::Keyword(Keyword::EndIf))?;
                let close = self.expect(Kind::StatementClose)?;

                (block.map(Alternate::Else), close.region)
            }
            _ => {
                let close = self.expect(Kind::StatementClose)?;

                (None, close.region)
            }
        };

        Ok(IfElse {
            condition,
            then_branch,
            else_branch,
            region: begin.combine(end),
        })
    }

    /// Parse the remainder of a "for" statement, after the `for` keyword.
    fn parse_for(&mut self, begin: Region) -> Result<ForLoop, Error> {
        let variable = self.expect(Kind::Identifier)?;
        let variable = Identifier {
            name: variable.raw(self.source).to_owned(),
            region: variable.region,
        };
        self.expect(Kind::Keyword(Keyword::In))?;
        let iterable = self.parse_expression()?;
        self.expect(Kind::StatementClose)?;

        let body = self.parse_block(&[Keyword::EndFor])?;
        self.expect(Kind::Keyword(Keyword::EndFor))?;
        let close = self.expect(Kind::StatementClose)?;

        Ok(ForLoop {
            variable,
            iterable,
            body,
            region: begin.combine(close.region),
        })
    }

    /// Parse statements until a statement beginning with one of the given
    /// keywords.
    ///
    /// The opening marker of that statement is consumed, the keyword is not.
    /// Returns `None` when no statements were found.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the tokens run out before a stop keyword.
    fn parse_block(&mut self, stops: &[Keyword]) -> Result<Option<Block>, Error> {
        let mut statements: Vec<Statement> = vec![];

        loop {
            if self.peek().is_none() {
                let expected = stops
                    .iter()
                    .map(|keyword| format!("`{keyword}`"))
                    .collect::<Vec<_>>()
                    .join(" or ");
                let mut error = self.end_of_input(expected);
                if let Some(last) = stops.last() {
                    error = error.with_help(format!("did you close the statement with `{last}`?"));
                }

                return Err(error);
            }
            if self.at_stop(stops) {
                self.index += 1;
                break;
            }
            statements.push(self.parse_statement()?);
        }

        let region = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.region().combine(last.region()),
            _ => return Ok(None),
        };

        Ok(Some(Block { statements, region }))
    }

    /// Return true if the upcoming tokens open a statement with one of the
    /// given keywords.
    fn at_stop(&self, stops: &[Keyword]) -> bool {
        let open = self.tokens.get(self.index);
        let keyword = self.tokens.get(self.index + 1);

        match (open, keyword) {
            (Some(open), Some(keyword)) => {
                open.kind == Kind::StatementOpen
                    && stops.iter().any(|stop| keyword.is_keyword(*stop))
            }
            _ => false,
        }
    }

    /// Parse an expression, including any filters applied to it.
    ///
    /// Filter arguments do not contain filters themselves unless
    /// they are wrapped in parentheses.
    fn parse_expression(&mut self) -> Result<Expression, Error> {
        // {{ name | prepend: "hello, " | append: "!" | upcase }}
        let mut expression = self.parse_disjunction()?;

        while self.next_is(Kind::Pipe) {
            self.index += 1;
            let callee = self.parse_disjunction()?;
            let mut region = expression.region().combine(callee.region());
            let mut arguments = vec![expression];

            if self.next_is(Kind::Colon) {
                self.index += 1;
                loop {
                    let argument = self.parse_disjunction()?;
                    region = region.combine(argument.region());
                    arguments.push(argument);

                    if !self.next_is(Kind::Comma) {
                        break;
                    }
                    self.index += 1;
                }
            }

            expression = Expression::Call(Call {
                callee: Box::new(callee),
                arguments,
                region,
            });
        }

        Ok(expression)
    }

    fn parse_disjunction(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_conjunction()?;
        while self.next_is(Kind::Or) {
            self.index += 1;
            let right = self.parse_conjunction()?;
            left = combine(Logical::Or, left, right);
        }

        Ok(left)
    }

    fn parse_conjunction(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_comparison()?;
        while self.next_is(Kind::And) {
            self.index += 1;
            let right = self.parse_comparison()?;
            left = combine(Logical::And, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_unary()?;
        while let Some(Kind::Operator(operator)) = self.peek().map(|token| token.kind) {
            self.index += 1;
            let right = self.parse_unary()?;
            let region = left.region().combine(right.region());

            left = Expression::Compare(Compare {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                region,
            });
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        if self.next_is(Kind::Bang) {
            let bang = self.next_must("`!`")?;
            let operand = self.parse_unary()?;
            let region = bang.region.combine(operand.region());

            return Ok(Expression::Not(Not {
                operand: Box::new(operand),
                region,
            }));
        }

        self.parse_access()
    }

    fn parse_access(&mut self) -> Result<Expression, Error> {
        let mut object = self.parse_primary()?;
        while self.next_is(Kind::Dot) {
            self.index += 1;
            let property = self.parse_primary()?;
            let region = object.region().combine(property.region());

            object = Expression::Member(Member {
                object: Box::new(object),
                property: Box::new(property),
                region,
            });
        }

        Ok(object)
    }

    /// Parse a literal, identifier, parenthesized expression or array.
    fn parse_primary(&mut self) -> Result<Expression, Error> {
        let expected = "an expression";
        let mut token = self.next_must(expected)?;

        match token.kind {
            Kind::Integer | Kind::Float | Kind::String | Kind::Boolean | Kind::Null => {
                match token.literal.take() {
                    Some(value) => Ok(Expression::Literal(Constant {
                        value,
                        region: token.region,
                    })),
                    None => Err(self.unexpected(&token, expected)),
                }
            }
            Kind::Identifier => Ok(Expression::Identifier(Identifier {
                name: token.raw(self.source).to_owned(),
                region: token.region,
            })),
            Kind::LeftParen => {
                let inner = self.parse_expression()?;
                self.expect(Kind::RightParen)?;

                Ok(inner)
            }
            Kind::LeftBracket => {
                let mut elements = vec![];
                while !self.next_is(Kind::RightBracket) {
                    elements.push(self.parse_expression()?);
                    if !self.next_is(Kind::Comma) {
                        break;
                    }
                    self.index += 1;
                }
                let close = self.expect(Kind::RightBracket)?;

                Ok(Expression::Array(Array {
                    elements,
                    region: token.region.combine(close.region),
                }))
            }
            _ => Err(self.unexpected(&token, expected)),
        }
    }

    /// Peek the next token.
    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Returns true if the next token is of the given kind.
    #[inline]
    fn next_is(&self, kind: Kind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    /// Get the next token.
    ///
    /// # Errors
    ///
    /// An error naming the expected construct is returned if no more
    /// tokens are left.
    fn next_must<T>(&mut self, expected: T) -> Result<Token, Error>
    where
        T: Display,
    {
        match self.tokens.get(self.index).cloned() {
            Some(token) => {
                self.index += 1;
                Ok(token)
            }
            None => Err(self.end_of_input(expected)),
        }
    }

    /// Get the next token, and compare it to the given kind.
    ///
    /// # Errors
    ///
    /// An error is returned if the next token is not of the given kind,
    /// or when no more tokens are left.
    fn expect(&mut self, kind: Kind) -> Result<Token, Error> {
        let token = self.next_must(kind)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(&token, kind))
        }
    }

    /// Return an [`Error`] explaining that the given token is not the
    /// expected construct.
    fn unexpected<T>(&self, token: &Token, expected: T) -> Error
    where
        T: Display,
    {
        Error::parse(expected_found(expected, token.raw(self.source)))
            .with_pointer(self.source, token.region)
    }

    /// Return an [`Error`] explaining that the tokens ended before the
    /// expected construct.
    fn end_of_input<T>(&self, expected: T) -> Error
    where
        T: Display,
    {
        let end = self.source.len();

        Error::parse(expected_eof(expected)).with_pointer(self.source, end..end)
    }
}

/// Combine two expressions with a logical operator.
fn combine(operator: Logical, left: Expression, right: Expression) -> Expression {
    let region = left.region().combine(right.region());

    Expression::Logical(Combine {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        region,
    })
}
