use crate::value::{Origin, Tagged, Value};
use std::fmt::{Result, Write};

/// Converts the text of each rendered fragment before it is written to the
/// output.
///
/// The [`Origin`] tells an `Escape` whether the text was written in the
/// template itself or came from a computed or host-provided value.
///
/// Any function matching the signature of [`escape`][`Escape::escape`] may
/// be used as an `Escape`:
///
/// ```
/// use quill::{Engine, Origin, Store};
///
/// let engine = Engine::default().with_escape(|text: &str, origin: Origin| match origin {
///     Origin::Source => text.to_owned(),
///     Origin::Host => text.replace('<', "&lt;").replace('>', "&gt;"),
/// });
/// let template = engine.compile("<b>{{ name }}</b>").unwrap();
/// let output = engine
///     .render(&template, &Store::new().with_must("name", "<i>taylor</i>"))
///     .unwrap();
///
/// assert_eq!(output, "<b>&lt;i&gt;taylor&lt;/i&gt;</b>");
/// ```
pub trait Escape: Send + Sync {
    /// Return the text that should be written in place of the given text.
    fn escape(&self, text: &str, origin: Origin) -> String;
}

impl<F> Escape for F
where
    F: Fn(&str, Origin) -> String + Send + Sync,
{
    fn escape(&self, text: &str, origin: Origin) -> String {
        self(text, origin)
    }
}

/// An [`Escape`] that writes every fragment unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Escape for Identity {
    fn escape(&self, text: &str, _: Origin) -> String {
        text.to_owned()
    }
}

/// Wraps some underlying buffer, and writes every fragment to it through
/// an [`Escape`].
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
    escape: &'buffer dyn Escape,
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String, escape: &'buffer dyn Escape) -> Self {
        Self { buffer, escape }
    }

    /// Write the given text to the Pipe buffer.
    ///
    /// # Errors
    ///
    /// The only error that will be returned is propagated from the underlying
    /// buffer itself.
    pub fn write_text(&mut self, text: &str, origin: Origin) -> Result {
        if text.is_empty() {
            return Ok(());
        }

        self.buffer.write_str(&self.escape.escape(text, origin))
    }

    /// Write the text form of the given value to the Pipe buffer.
    ///
    /// # Errors
    ///
    /// The only error that will be returned is propagated from the underlying
    /// buffer itself.
    pub fn write_value(&mut self, tagged: &Tagged) -> Result {
        match &tagged.value {
            Value::String(string) => self.write_text(string, tagged.origin),
            value => self.write_text(&value.to_string(), tagged.origin),
        }
    }
}
