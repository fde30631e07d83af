use crate::{
    log::{Error, ErrorKind},
    value::{to_value, Value},
};
use serde::Serialize;
use std::collections::HashMap;

/// Provides storage for data that templates can be rendered against.
///
/// Any serializable type may be inserted. It is converted into a [`Value`]
/// once, when it is inserted.
#[derive(Debug, Clone, Default)]
pub struct Store {
    data: HashMap<String, Value>,
}

impl Store {
    /// Create a new Store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the value into the Store.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let key = key.into();
        let serialized = to_value(value).map_err(|error| {
            Error::build(format!("value for `{key}` is unserializable"))
                .with_kind(ErrorKind::Config)
                .with_help(error.reason())
        })?;

        self.data.insert(key, serialized);
        Ok(())
    }

    /// Insert the value into the Store.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        if let Err(error) = self.insert(key, value) {
            panic!("{error}");
        }
    }

    /// Insert a [`Value`] into the Store without serializing it.
    ///
    /// This is the only way to store a [`Function`][`crate::filter::Function`].
    #[inline]
    pub fn insert_value<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Into<Value>,
    {
        self.data.insert(key.into(), value.into());
    }

    /// Insert the value into the Store.
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Insert the value into the Store.
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);
        self
    }

    /// Insert a [`Value`] into the Store without serializing it.
    ///
    /// Returns the Store, so additional methods may be chained.
    #[inline]
    pub fn with_value<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Into<Value>,
    {
        self.insert_value(key, value);
        self
    }

    /// Get the value of the given key, if any.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    #[inline]
    pub(crate) fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use crate::{Store, Value};
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use std::collections::HashMap;

    #[test]
    fn test_insert() {
        let mut store = Store::new();
        store.insert_must("one", "two");

        assert_eq!(store.get("one").and_then(Value::as_str), Some("two"));
    }

    #[test]
    fn test_insert_fluent() {
        let store = Store::new().with_must("three", 4).with_must("five", 5.5);

        assert_eq!(store.get("three"), Some(&Value::Integer(4)));
        assert_eq!(store.get("five"), Some(&Value::Float(5.5)));
    }

    #[test]
    fn test_insert_struct() {
        #[derive(Serialize)]
        struct Person {
            name: &'static str,
            tags: Vec<&'static str>,
        }

        let store = Store::new().with_must(
            "person",
            Person {
                name: "taylor",
                tags: vec!["a"],
            },
        );

        assert_eq!(
            store.get("person"),
            Some(&Value::Object(HashMap::from([
                ("name".to_owned(), Value::from("taylor")),
                ("tags".to_owned(), Value::from(vec!["a"])),
            ])))
        );
    }

    #[test]
    fn test_insert_unserializable() {
        let map = HashMap::from([((1, 2), "tuple keys are not strings")]);

        assert!(Store::new().with("map", map).is_err());
    }

    #[test]
    fn test_insert_value() {
        let store = Store::new().with_value("nan", f64::NAN);

        assert_eq!(store.get("nan"), Some(&Value::NaN));
    }

    #[test]
    fn test_insert_nan() {
        let store = Store::new()
            .with_must("x", f64::NAN)
            .with_must("xs", vec![1.5, f64::NAN]);

        assert_eq!(store.get("x"), Some(&Value::NaN));
        assert_eq!(
            store.get("xs"),
            Some(&Value::Array(vec![Value::Float(1.5), Value::NaN]))
        );
    }
}
