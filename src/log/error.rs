use super::{Pointer, RED, RESET};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Describes which stage of the engine produced an [`Error`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// The scanner found a malformed token.
    Syntax,
    /// The parser found a grammar violation.
    Parse,
    /// The renderer could not evaluate the template.
    Render,
    /// A filter returned an error of its own.
    Filter,
    /// The engine was configured with invalid options.
    Config,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ErrorKind::Syntax => write!(f, "Syntax"),
            ErrorKind::Parse => write!(f, "Parse"),
            ErrorKind::Render => write!(f, "Render"),
            ErrorKind::Filter => write!(f, "Filter"),
            ErrorKind::Config => write!(f, "Config"),
        }
    }
}

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use quill::filter::Error;
///
/// let error = Error::build("unexpected keyword")
///     .with_pointer("{% update name %}", 3..9)
///     .with_name("template.txt")
///     .with_help(r#"expected "if" or "for""#);
///
/// assert_eq!(error.line(), Some(1));
/// assert_eq!(error.column(), Some(4));
/// ```
///
/// When printed with `println!("{}", error)` the [`Error`] produces this output:
///
/// ```text
/// Filter error: unexpected keyword at line 1, column 4
///   --> template.txt:1:4
///    |
///  1 | {% update name %}
///    |    ^^^^^^
///    |
///   = help: expected "if" or "for"
/// ```
///
/// The alternate form, `{:#}`, prints the same text with terminal colors.
pub struct Error {
    /// The stage that produced the [`Error`].
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given reason text.
    ///
    /// The kind is [`ErrorKind::Filter`], which is what a user-defined
    /// filter should return. The additional fields may be populated using
    /// the various methods defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::filter::Error;
    ///
    /// Error::build("filter `left` expects string input")
    ///     .with_help("use quotes to coerce data to string");
    /// ```
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind: ErrorKind::Filter,
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Create a new [`Error`] of kind [`ErrorKind::Syntax`].
    pub(crate) fn syntax<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(reason).with_kind(ErrorKind::Syntax)
    }

    /// Create a new [`Error`] of kind [`ErrorKind::Parse`].
    pub(crate) fn parse<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(reason).with_kind(ErrorKind::Parse)
    }

    /// Create a new [`Error`] of kind [`ErrorKind::Render`].
    pub(crate) fn render<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(reason).with_kind(ErrorKind::Render)
    }

    /// Set the [`ErrorKind`].
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;

        self
    }

    /// Set the reason text, which is a short summary of the [`Error`].
    pub fn with_reason<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.reason = text.into();

        self
    }

    /// Set the name text, which is the name of the template that the
    /// [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    ///
    /// This is a shortcut for creating a `Pointer` yourself and passing it
    /// to [`with_visual`][`Error::with_visual`].
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the reason text.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the template that the error is related to.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return true if a [`Visual`] is attached.
    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    /// Return the one-based line the [`Visual`] points at, if any.
    pub fn line(&self) -> Option<usize> {
        self.visual.as_ref().map(|v| v.location().0)
    }

    /// Return the one-based column the [`Visual`] points at, if any.
    pub fn column(&self) -> Option<usize> {
        self.visual.as_ref().map(|v| v.location().1)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let color = f.alternate();
        if color {
            write!(f, "{RED}{} error{RESET}: {}", self.kind, self.reason)?;
        } else {
            write!(f, "{} error: {}", self.kind, self.reason)?;
        }

        match &self.visual {
            Some(visual) => {
                let (line, column) = visual.location();
                write!(f, " at line {line}, column {column}")?;
                visual.display(f, self.name.as_deref(), self.help.as_deref(), color)
            }
            None => match &self.help {
                Some(help) => write!(f, "\n  = help: {help}"),
                None => Ok(()),
            },
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.reason == other.reason
            && self.help == other.help
            && self.name == other.name
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_display_begins_with_kind() {
        let error = Error::syntax("invalid or unexpected token \"^\"").with_pointer("{{ ^ }}", 3..4);
        let text = error.to_string();

        assert!(text.starts_with("Syntax error: invalid or unexpected token \"^\""));
        assert!(text.contains("at line 1, column 4"));
        assert!(text.contains("{{ ^ }}"));
    }

    #[test]
    fn test_display_without_visual() {
        let error = Error::render("call to undefined filter `nope`").with_help("register it first");

        assert_eq!(
            error.to_string(),
            "Render error: call to undefined filter `nope`\n  = help: register it first"
        );
        assert_eq!(error.line(), None);
    }

    #[test]
    fn test_build_is_filter_kind() {
        assert_eq!(Error::build("boom").kind(), ErrorKind::Filter);
        assert_eq!(Error::parse("boom").kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_location() {
        let error = Error::parse("expected").with_pointer("one\ntwo three", 8..13);

        assert_eq!(error.line(), Some(2));
        assert_eq!(error.column(), Some(5));
    }
}
