//! Filters registered on every [`Engine`][`crate::Engine`] created with
//! [`Engine::default`][`crate::Engine::default`].
//!
//! Filters that operate on text return any other input unchanged.
use super::{Error, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;

/// Signature shared by every built-in filter.
pub type Builtin = fn(&Value, &[Value]) -> Result<Value, Error>;

/// Pattern used by [`date`] when none is given.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Words left in lowercase by [`titlecase`], unless first or last.
const SMALL_WORDS: [&str; 19] = [
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "via", "vs",
];

/// Date and time layouts accepted by [`date`], read as UTC.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date layouts accepted by [`date`], read as midnight UTC.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Return every built-in filter with the name it is registered under.
pub fn all() -> [(&'static str, Builtin); 6] {
    [
        ("capitalize", capitalize),
        ("date", date),
        ("default", default),
        ("downcase", downcase),
        ("titlecase", titlecase),
        ("upcase", upcase),
    ]
}

/// Uppercase the first character of a string.
pub fn capitalize(input: &Value, _: &[Value]) -> Result<Value, Error> {
    let Value::String(string) = input else {
        return Ok(input.clone());
    };

    let mut chars = string.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().into(),
        None => input.clone(),
    })
}

/// Lowercase a string.
pub fn downcase(input: &Value, _: &[Value]) -> Result<Value, Error> {
    Ok(match input {
        Value::String(string) => string.to_lowercase().into(),
        _ => input.clone(),
    })
}

/// Uppercase a string.
pub fn upcase(input: &Value, _: &[Value]) -> Result<Value, Error> {
    Ok(match input {
        Value::String(string) => string.to_uppercase().into(),
        _ => input.clone(),
    })
}

/// Uppercase the first character of each word in a string, except for
/// small words such as "and" or "the" in the middle of the text.
pub fn titlecase(input: &Value, _: &[Value]) -> Result<Value, Error> {
    let Value::String(string) = input else {
        return Ok(input.clone());
    };

    let words: Vec<&str> = string.split(' ').collect();
    let first = words.iter().position(|word| !word.is_empty());
    let last = words.iter().rposition(|word| !word.is_empty());

    let titled: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let edge = Some(index) == first || Some(index) == last;
            if !edge && SMALL_WORDS.contains(&word.to_lowercase().as_str()) {
                return (*word).to_owned();
            }

            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    Ok(titled.join(" ").into())
}

/// Substitute the first argument when the input is an empty string, null,
/// false, or NaN.
///
/// Returns null when there is no argument to substitute.
pub fn default(input: &Value, args: &[Value]) -> Result<Value, Error> {
    let is_empty = match input {
        Value::String(string) => string.is_empty(),
        Value::Null | Value::Boolean(false) => true,
        _ => input.is_nan(),
    };

    Ok(if is_empty {
        args.first().cloned().unwrap_or_default()
    } else {
        input.clone()
    })
}

/// Format a date with the strftime-style pattern in the first argument.
///
/// The input may be the string "now", a date string, or an integer amount
/// of milliseconds since the Unix epoch. Any other input, or a string that
/// is not a recognizable date, is returned unchanged.
///
/// # Errors
///
/// Returns an [`Error`] when the pattern is not a string, or contains an
/// invalid specifier.
pub fn date(input: &Value, args: &[Value]) -> Result<Value, Error> {
    let pattern = match args.first() {
        None | Some(Value::Null) => DEFAULT_DATE_PATTERN,
        Some(Value::String(pattern)) => pattern,
        Some(other) => {
            return Err(Error::build(format!(
                "filter `date` expects a string pattern, received {}",
                other.kind()
            ))
            .with_help("try a pattern such as \"%b %d, %Y\""))
        }
    };
    let Some(parsed) = parse_date(input) else {
        return Ok(input.clone());
    };

    let mut output = String::new();
    write!(output, "{}", parsed.format(pattern)).map_err(|_| {
        Error::build(format!("invalid date pattern `{pattern}`"))
            .with_help("refer to the strftime specifiers supported by chrono")
    })?;

    Ok(output.into())
}

/// Read a date from a [`Value`], if it describes one.
fn parse_date(input: &Value) -> Option<DateTime<FixedOffset>> {
    match input {
        Value::String(text) if text == "now" => Some(Utc::now().into()),
        Value::String(text) => parse_date_text(text.trim()),
        Value::Integer(millis) => Utc.timestamp_millis_opt(*millis).single().map(Into::into),
        _ => None,
    }
}

/// Read a date from text in any of the recognized layouts.
fn parse_date_text(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed);
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive).into())
}

#[cfg(test)]
mod tests {
    use super::{capitalize, date, default, downcase, titlecase, upcase};
    use crate::filter::Value;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Value {
        Value::from(value)
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(&text("my great text"), &[]).unwrap(), text("My great text"));
        assert_eq!(capitalize(&text(""), &[]).unwrap(), text(""));
        assert_eq!(capitalize(&Value::Integer(4), &[]).unwrap(), Value::Integer(4));
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(downcase(&text("Text"), &[]).unwrap(), text("text"));
        assert_eq!(upcase(&text("text"), &[]).unwrap(), text("TEXT"));
        assert_eq!(upcase(&Value::Null, &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_titlecase() {
        assert_eq!(titlecase(&text("my great text"), &[]).unwrap(), text("My Great Text"));
        assert_eq!(
            titlecase(&text("james and the giant peach"), &[]).unwrap(),
            text("James and the Giant Peach")
        );
        assert_eq!(titlecase(&text("the end of"), &[]).unwrap(), text("The End Of"));
    }

    #[test]
    fn test_default() {
        let fallback = [text("D")];

        for input in [text(""), Value::Null, Value::Boolean(false), Value::NaN] {
            assert_eq!(default(&input, &fallback).unwrap(), text("D"));
        }
        assert_eq!(default(&text("Text"), &fallback).unwrap(), text("Text"));
        assert_eq!(
            default(&Value::Array(vec![]), &fallback).unwrap(),
            Value::Array(vec![])
        );
        assert_eq!(default(&Value::Integer(0), &fallback).unwrap(), Value::Integer(0));
        assert_eq!(default(&Value::Null, &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_date_formats() {
        let pattern = [text("%b %d, %y")];

        assert_eq!(date(&text("March 14, 2016"), &pattern).unwrap(), text("Mar 14, 16"));
        assert_eq!(date(&text("2016-03-14"), &pattern).unwrap(), text("Mar 14, 16"));
        assert_eq!(
            date(&text("2016-03-14T10:30:00Z"), &[text("%H:%M")]).unwrap(),
            text("10:30")
        );
        assert_eq!(
            date(&text("2016-03-14 10:30:00"), &[]).unwrap(),
            text("2016-03-14")
        );
        assert_eq!(
            date(&Value::Integer(1_457_913_600_000), &pattern).unwrap(),
            text("Mar 14, 16")
        );
    }

    #[test]
    fn test_date_passthrough() {
        let pattern = [text("%Y")];

        assert_eq!(date(&text("not a date"), &pattern).unwrap(), text("not a date"));
        assert_eq!(date(&Value::Boolean(true), &pattern).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_date_now() {
        let year = date(&text("now"), &[text("%Y")]).unwrap();

        assert_eq!(year.as_str().map(str::len), Some(4));
    }

    #[test]
    fn test_date_invalid_pattern() {
        assert!(date(&text("2016-03-14"), &[Value::Integer(3)]).is_err());
        assert!(date(&text("2016-03-14"), &[text("%Q")]).is_err());
    }
}
