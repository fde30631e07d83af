//! Promotion of values between kinds, and the comparison rules built on it.
use crate::{compile::Operator, value::Value};
use std::cmp::Ordering;

/// A kind that a [`Value`] may be promoted to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Target {
    Boolean,
    Integer,
    Float,
    String,
}

/// Promote the [`Value`] to the given [`Target`] kind.
///
/// Promotion never fails. Text that does not begin with a number promotes
/// to zero, and kinds without a numeric form promote through their
/// truthiness.
pub fn promote(value: &Value, target: Target) -> Value {
    match target {
        Target::Boolean => Value::Boolean(is_truthy(value)),
        Target::Integer => Value::Integer(to_integer(value)),
        Target::Float => Value::Float(to_float(value)),
        Target::String => match value {
            Value::String(_) => value.clone(),
            _ => Value::String(value.to_string()),
        },
    }
}

/// Return true if the given [`Value`] is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(boolean) => *boolean,
        Value::Integer(integer) => *integer != 0,
        Value::Float(float) => *float != 0.0 && !float.is_nan(),
        Value::String(string) => !string.is_empty(),
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
        Value::Function(_) => true,
        Value::Null | Value::NaN => false,
    }
}

/// Promote the [`Value`] to a float.
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Integer(integer) => *integer as f64,
        Value::Float(float) => *float,
        Value::String(string) => parse_float_prefix(string),
        _ => f64::from(u8::from(is_truthy(value))),
    }
}

/// Promote the [`Value`] to an integer, truncating floats toward zero.
pub fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Integer(integer) => *integer,
        Value::Float(float) => *float as i64,
        Value::String(string) => parse_integer_prefix(string),
        _ => i64::from(is_truthy(value)),
    }
}

/// Compare the two [`Value`] instances with the given [`Operator`].
///
/// A NaN on either side is unequal to everything. Two strings are compared
/// lexicographically, and any other pair is compared as floats.
pub fn compare(left: &Value, operator: Operator, right: &Value) -> bool {
    if left.is_nan() || right.is_nan() {
        return operator == Operator::NotEqual;
    }

    let ordering = match (left, right) {
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => to_float(left).partial_cmp(&to_float(right)),
    };

    match ordering {
        Some(ordering) => match operator {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::Lesser => ordering == Ordering::Less,
            Operator::LesserOrEqual => ordering != Ordering::Greater,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
        },
        None => operator == Operator::NotEqual,
    }
}

/// Read the longest prefix of the text that forms a decimal number.
///
/// Leading whitespace is ignored. Returns zero when no digits are found.
fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits(end);
    end += whole;

    let mut mantissa = whole > 0;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(end + 1);
        if whole > 0 || fraction > 0 {
            mantissa = true;
            end += 1 + fraction;
        }
    }
    if !mantissa {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

/// Read the longest prefix of the text that forms a decimal integer.
///
/// Leading whitespace is ignored. Returns zero when no digits are found.
fn parse_integer_prefix(text: &str) -> i64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign..]
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();

    if digits == 0 {
        return 0;
    }

    // Saturates when out of range.
    text[..sign + digits].parse::<f64>().map_or(0, |float| float as i64)
}

#[cfg(test)]
mod tests {
    use super::{compare, is_truthy, promote, to_float, to_integer, Target};
    use crate::{compile::Operator, value::Value};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const OPERATORS: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Lesser,
        Operator::LesserOrEqual,
        Operator::Greater,
        Operator::GreaterOrEqual,
    ];

    #[test]
    fn test_truthy() {
        let truthy = [
            Value::from("lorem"),
            Value::Integer(12),
            Value::Float(-0.5),
            Value::Boolean(true),
            Value::from(vec!["lorem"]),
            Value::from(HashMap::from([("a".to_owned(), 1)])),
        ];
        let falsy = [
            Value::from(""),
            Value::Integer(0),
            Value::Float(0.0),
            Value::Boolean(false),
            Value::Array(vec![]),
            Value::Object(HashMap::new()),
            Value::Null,
            Value::NaN,
        ];

        for value in truthy {
            assert!(is_truthy(&value), "{value:?}");
        }
        for value in falsy {
            assert!(!is_truthy(&value), "{value:?}");
        }
    }

    #[test]
    fn test_promote_numeric() {
        assert_eq!(promote(&Value::Boolean(true), Target::Integer), Value::Integer(1));
        assert_eq!(promote(&Value::Float(-2.9), Target::Integer), Value::Integer(-2));
        assert_eq!(promote(&Value::Integer(3), Target::Float), Value::Float(3.0));
        assert_eq!(promote(&Value::Null, Target::Float), Value::Float(0.0));
        assert_eq!(promote(&Value::from(vec![1]), Target::Integer), Value::Integer(1));
        assert_eq!(promote(&Value::NaN, Target::Integer), Value::Integer(0));
    }

    #[test]
    fn test_promote_string_prefix() {
        assert_eq!(to_float(&Value::from("3.5 apples")), 3.5);
        assert_eq!(to_float(&Value::from("  -.5e1x")), -5.0);
        assert_eq!(to_float(&Value::from("1e")), 1.0);
        assert_eq!(to_float(&Value::from("apples")), 0.0);
        assert_eq!(to_integer(&Value::from("42.9")), 42);
        assert_eq!(to_integer(&Value::from("-7 days")), -7);
        assert_eq!(to_integer(&Value::from("")), 0);
    }

    #[test]
    fn test_promote_string() {
        assert_eq!(promote(&Value::Float(1.0), Target::String), Value::from("1.0"));
        assert_eq!(promote(&Value::Boolean(false), Target::String), Value::from(""));
        assert_eq!(promote(&Value::from("x"), Target::String), Value::from("x"));
        assert_eq!(promote(&Value::from(""), Target::Boolean), Value::Boolean(false));
    }

    #[test]
    fn test_compare_nan() {
        for value in [Value::NaN, Value::Integer(1), Value::from("a")] {
            for operator in OPERATORS {
                let expect = operator == Operator::NotEqual;
                assert_eq!(compare(&Value::NaN, operator, &value), expect);
                assert_eq!(compare(&value, operator, &Value::NaN), expect);
            }
        }
    }

    #[test]
    fn test_compare_numbers() {
        assert!(compare(&Value::Integer(1), Operator::Equal, &Value::Float(1.0)));
        assert!(compare(&Value::Integer(2), Operator::Greater, &Value::Float(1.5)));
        assert!(compare(&Value::from("10"), Operator::Greater, &Value::Integer(9)));
        assert!(compare(&Value::Boolean(true), Operator::Equal, &Value::Integer(1)));
        assert!(compare(&Value::Null, Operator::LesserOrEqual, &Value::Integer(0)));
    }

    #[test]
    fn test_compare_strings() {
        assert!(compare(&Value::from("10"), Operator::Lesser, &Value::from("9")));
        assert!(compare(&Value::from("abc"), Operator::Equal, &Value::from("abc")));
        assert!(compare(&Value::from("b"), Operator::GreaterOrEqual, &Value::from("a")));
    }
}
