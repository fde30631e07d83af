//! Quill - Template Engine
//!
//! A small template language with expressions, filters, conditionals and
//! bounded loops. Templates are compiled once into a [`Template`] and may
//! then be rendered any amount of times against a [`Store`].
//!
//! ```
//! use quill::{parse, render, Store};
//!
//! let template = parse("{% for n in names %}{{ n | upcase }} {% endfor %}").unwrap();
//! let store = Store::new().with_must("names", ["ada", "grace"]);
//!
//! assert_eq!(render(&template, &store).unwrap(), "ADA GRACE ");
//! ```
//!
//! Use an [`Engine`] to register your own filters, or to change the
//! delimiters, the loop limit or the escape function.
mod compile;
mod engine;
mod log;
mod pipe;
mod region;
mod render;
mod store;
mod syntax;
mod value;

pub mod filter;

pub use compile::{compile, Template};
pub use engine::{Engine, DEFAULT_LOOP_LIMIT};
pub use log::{Error, ErrorKind};
pub use pipe::{Escape, Identity};
pub use render::{compare, is_truthy, promote, to_float, to_integer, Target};
pub use store::Store;
pub use syntax::{Builder, Marker, Syntax};
pub use value::{to_value, Function, Origin, Tagged, Value};

use std::sync::OnceLock;

/// Return the shared [`Engine`] used by the free functions, which has the
/// built-in filters and default settings.
fn default_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();

    ENGINE.get_or_init(Engine::default)
}

/// Compile a [`Template`] with the default delimiters.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`ErrorKind::Syntax`] when the text contains
/// a malformed token, or [`ErrorKind::Parse`] when the tokens do not form a
/// valid template.
///
/// # Examples
///
/// ```
/// let error = quill::parse("{% if x %}unclosed").unwrap_err();
///
/// assert!(error.to_string().starts_with("Parse error"));
/// ```
#[inline]
pub fn parse(text: &str) -> Result<Template<'_>, Error> {
    default_engine().compile(text)
}

/// Render a [`Template`] with the built-in filters.
///
/// # Errors
///
/// Returns an [`Error`] if a filter fails or cannot be found.
#[inline]
pub fn render(template: &Template, store: &Store) -> Result<String, Error> {
    default_engine().render(template, store)
}

/// Compile and render the text in one step, with the default delimiters and
/// the built-in filters.
///
/// # Errors
///
/// Returns an [`Error`] if either compiling or rendering fails.
///
/// # Examples
///
/// ```
/// use quill::{parse_and_render, Store};
///
/// let store = Store::new().with_must("name", "");
/// let output = parse_and_render("hello, {{ name | default: \"world\" }}!", &store);
///
/// assert_eq!(output.unwrap(), "hello, world!");
/// ```
#[inline]
pub fn parse_and_render(text: &str, store: &Store) -> Result<String, Error> {
    default_engine().parse_and_render(text, store)
}
