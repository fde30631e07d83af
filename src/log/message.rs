use super::Error;
use std::fmt::Display;

pub const UNEXPECTED_TOKEN: &str = "invalid or unexpected token";
pub const UNDEFINED_FILTER: &str = "call to undefined filter";
pub const INVALID_FILTER: &str = "invalid filter";

/// Return the reason text for an unexpected token in the scanner.
pub fn unexpected_token<T>(raw: T) -> String
where
    T: Display,
{
    format!("{UNEXPECTED_TOKEN} \"{}\"", raw.to_string().escape_debug())
}

/// Return the reason text for a grammar violation on a found token.
pub fn expected_found<T, Y>(expected: T, found: Y) -> String
where
    T: Display,
    Y: Display,
{
    format!("expected {expected}, but found \"{found}\"")
}

/// Return the reason text for a grammar violation at the end of input.
pub fn expected_eof<T>(expected: T) -> String
where
    T: Display,
{
    format!("expected {expected}, but reached end of input")
}

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::render("write failure")
        .with_help("failed to write result of render, are you low on memory?")
}
