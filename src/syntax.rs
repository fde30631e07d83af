//! Quill uses a type known as a [`Syntax`] to understand what delimiters
//! you would like to use in your templates. This module defines the
//! [`Builder`] type, which provides methods to easily generate a `Syntax`.
//!
//! After a `Syntax` has been created, it can be passed to an
//! [`Engine`][`crate::Engine`] and used to parse templates.
use crate::log::{Error, ErrorKind};

/// Markers that identify statements and expressions within text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Marker {
    /// Beginning of an expression, which outputs the value it evaluates to.
    BeginExpression,
    /// End of an expression.
    EndExpression,
    /// Beginning of a statement, which allows for logical constructs such
    /// as "if" and "for".
    BeginStatement,
    /// End of a statement.
    EndStatement,
}

/// The delimiters recognized by the scanner.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Syntax {
    begin_expression: String,
    end_expression: String,
    begin_statement: String,
    end_statement: String,
}

impl Syntax {
    /// Return the text of the given [`Marker`].
    pub fn get(&self, marker: Marker) -> &str {
        match marker {
            Marker::BeginExpression => &self.begin_expression,
            Marker::EndExpression => &self.end_expression,
            Marker::BeginStatement => &self.begin_statement,
            Marker::EndStatement => &self.end_statement,
        }
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            begin_expression: "{{".into(),
            end_expression: "}}".into(),
            begin_statement: "{%".into(),
            end_statement: "%}".into(),
        }
    }
}

/// Provides methods to build a [`Syntax`].
///
/// # Example
///
/// ```
/// use quill::Builder;
///
/// let syntax = Builder::new()
///     .with_expression("((", "))")
///     .with_statement("(*", "*)")
///     .to_syntax();
///
/// assert!(syntax.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Builder<'marker> {
    expression: (&'marker str, &'marker str),
    statement: (&'marker str, &'marker str),
}

impl<'marker> Builder<'marker> {
    /// Create a new [`Builder`].
    ///
    /// The `Builder` has default markers:
    ///
    /// ```text
    /// Expressions: {{ name }}
    /// Statements: {% if ... %}
    /// ```
    ///
    /// To proceed with these defaults, you may immediately call `to_syntax` to receive the
    /// [`Syntax`] instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            expression: ("{{", "}}"),
            statement: ("{%", "%}"),
        }
    }

    /// Set the expression markers.
    #[inline]
    pub fn set_expression(&mut self, begin: &'marker str, end: &'marker str) {
        self.expression = (begin, end);
    }

    /// Set the expression markers.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_expression(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_expression(begin, end);

        self
    }

    /// Set the statement markers.
    #[inline]
    pub fn set_statement(&mut self, begin: &'marker str, end: &'marker str) {
        self.statement = (begin, end);
    }

    /// Set the statement markers.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_statement(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_statement(begin, end);

        self
    }

    /// Return a [`Syntax`] instance from the markers in this [`Builder`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a marker is empty or contains whitespace,
    /// or when both opening markers are identical.
    pub fn to_syntax(self) -> Result<Syntax, Error> {
        let (begin_expression, end_expression) = self.expression;
        let (begin_statement, end_statement) = self.statement;

        for marker in [begin_expression, end_expression, begin_statement, end_statement] {
            if marker.is_empty() || marker.chars().any(char::is_whitespace) {
                return Err(Error::build(format!("invalid marker `{marker}`"))
                    .with_kind(ErrorKind::Config)
                    .with_help("markers must be non-empty and must not contain whitespace"));
            }
        }
        if begin_expression == begin_statement {
            return Err(Error::build(format!("ambiguous marker `{begin_expression}`"))
                .with_kind(ErrorKind::Config)
                .with_help("expressions and statements must begin with different markers"));
        }

        Ok(Syntax {
            begin_expression: begin_expression.into(),
            end_expression: end_expression.into(),
            begin_statement: begin_statement.into(),
            end_statement: end_statement.into(),
        })
    }
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Builder, Marker, Syntax};
    use crate::log::ErrorKind;

    #[test]
    fn test_default_markers() {
        let syntax = Builder::new().to_syntax().unwrap();

        assert_eq!(syntax, Syntax::default());
        assert_eq!(syntax.get(Marker::BeginExpression), "{{");
        assert_eq!(syntax.get(Marker::EndStatement), "%}");
    }

    #[test]
    fn test_custom_markers() {
        let syntax = Builder::new()
            .with_expression("<<", ">>")
            .with_statement("<%", "%>")
            .to_syntax()
            .unwrap();

        assert_eq!(syntax.get(Marker::BeginExpression), "<<");
        assert_eq!(syntax.get(Marker::BeginStatement), "<%");
    }

    #[test]
    fn test_empty_marker() {
        let result = Builder::new().with_expression("", "}}").to_syntax();

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_identical_opening_markers() {
        let result = Builder::new()
            .with_expression("{{", "}}")
            .with_statement("{{", "%}")
            .to_syntax();

        assert!(result.is_err());
    }
}
