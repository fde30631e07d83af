//! Contains the [`Filter`] trait, and types useful for creating and using
//! filters.
//!
//! A `Filter` is a host function that can be used to modify a [`Value`]
//! before it is rendered. Any struct that implements the [`Filter`] trait,
//! or function matching the [`apply`][`Filter::apply`] method, can be registered
//! as a `Filter` on an [`Engine`][`crate::Engine`].
//!
//! A `Filter` registered with an `Engine` is available for use in any
//! [`Template`][`crate::Template`] rendered by that `Engine`.
//!
//! ## Examples
//!
//! This expression attempts to render a "name" variable from the
//! [`Store`][`crate::Store`], but you can also pass in literal values like
//! strings and numbers.
//!
//! ```html
//! {{ name | prepend: "hello, " | append: "!", "?" | upcase }}
//! ```
//!
//! Upon rendering this expression, Quill will look up "name" and use that
//! value as the input for `prepend`, the first filter in the call chain.
//! The `prepend` filter receives one argument, "hello, ", and the `append`
//! filter receives two, "!" and "?".
//!
//! We'll create a filter that reverses a string. You can either create a
//! struct and implement the trait on it, or just create a function matching
//! the trait signature:
//!
//! ```
//! use quill::{
//!     filter::{Error, Value},
//!     Engine, Store,
//! };
//!
//! fn reverse(value: &Value, _: &[Value]) -> Result<Value, Error> {
//!     match value {
//!         Value::String(string) => Ok(string.chars().rev().collect::<String>().into()),
//!         _ => Err(Error::build("filter `reverse` requires string input")
//!                 .with_help("use quotes to coerce data to string")),
//!     }
//! }
//!
//! let engine = Engine::default().with_filter_must("reverse", reverse);
//! let template = engine.compile("{{ name | reverse }}").unwrap();
//! let result = engine
//!     .render(&template, &Store::new().with_must("name", "taylor"))
//!     .unwrap();
//!
//! assert_eq!(result, "rolyat");
//! ```
//!
//! The [`with_visual`][`crate::filter::Error::with_visual`] method can be used to
//! create a visualization when your `Filter` needs to return an [`Error`]. If you
//! don't set one yourself, Quill will automatically assign a
//! [`Pointer`][`crate::filter::visual::Pointer`] that points to the `Filter` name.
//!
//! If you were to pass a number to the filter and print the error with `{}`,
//! you would see:
//!
//! ```text
//! Filter error: filter `reverse` requires string input at line 1, column 11
//!   --> ?:1:11
//!    |
//!  1 | {{ name | reverse }}
//!    |           ^^^^^^^
//!    |
//!    = help: use quotes to coerce data to string
//! ```
pub mod builtin;

pub mod visual {
    //! Contains the `Visual` trait and different types which implement `Visual`.
    pub use crate::log::{Pointer, Visual};
}

pub use crate::{
    log::{Error, ErrorKind},
    region::Region,
    value::{Function, Value},
};

/// Describes a type which can be used to transform input in an expression.
pub trait Filter: Sync + Send {
    /// Execute the filter with the given input and arguments, and return a
    /// new [`Value`] as output.
    fn apply(&self, input: &Value, args: &[Value]) -> Result<Value, Error>;
}

/// Allows assignment of any function matching the signature of `apply` as a `Filter`
/// to `Engine`, instead of requiring a struct be created.
impl<F> Filter for F
where
    F: Fn(&Value, &[Value]) -> Result<Value, Error> + Sync + Send,
{
    fn apply(&self, input: &Value, args: &[Value]) -> Result<Value, Error> {
        self(input, args)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Filter, Value};
    use crate::{Engine, Store};
    use pretty_assertions::assert_eq;

    /// Return the first n characters of the input from the left, where n
    /// is the first argument.
    struct Left;

    impl Filter for Left {
        fn apply(&self, input: &Value, args: &[Value]) -> Result<Value, Error> {
            let (Value::String(string), [Value::Integer(n)]) = (input, args) else {
                return Err(Error::build("filter `left` expects a string and one integer"));
            };

            Ok(string
                .chars()
                .take(usize::try_from(*n).unwrap_or_default())
                .collect::<String>()
                .into())
        }
    }

    #[test]
    fn test_call_chain() {
        let engine = Engine::default().with_filter_must("left", Left);
        let template = engine.compile("{{ name | downcase | left: 3 }}").unwrap();
        let result = engine.render(&template, &Store::new().with_must("name", "TAYLOR"));

        assert_eq!(result.unwrap(), "tay");
    }

    #[test]
    fn test_call_chain_error() {
        let engine = Engine::default().with_filter_must("left", Left);
        let template = engine.compile("{{ name | left: \"10\" }}").unwrap();
        let error = engine
            .render(&template, &Store::new().with_must("name", "TAYLOR"))
            .unwrap_err();

        assert_eq!(error.reason(), "filter `left` expects a string and one integer");
        assert_eq!(error.column(), Some(11));
    }
}
