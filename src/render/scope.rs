use crate::value::Value;
use std::{borrow::Cow, collections::HashMap};

/// A chain of variable bindings.
///
/// Frames live in a single arena and refer to their parent by index. Lookup
/// walks from the current frame toward the root, and definitions only ever
/// touch the current frame.
///
/// Frames may borrow their bindings, so the root frame can refer to the
/// filters of an `Engine` and its child to a `Store` without cloning either.
#[derive(Debug)]
pub struct Scope<'data> {
    frames: Vec<Frame<'data>>,
    current: usize,
}

#[derive(Debug)]
struct Frame<'data> {
    bindings: Cow<'data, HashMap<String, Value>>,
    parent: Option<usize>,
}

impl<'data> Scope<'data> {
    /// Create a new [`Scope`] whose root frame borrows the given bindings.
    pub fn new(root: &'data HashMap<String, Value>) -> Self {
        Self {
            frames: vec![Frame {
                bindings: Cow::Borrowed(root),
                parent: None,
            }],
            current: 0,
        }
    }

    /// Enter a new, empty frame.
    pub fn push(&mut self) {
        self.push_frame(Cow::Owned(HashMap::new()));
    }

    /// Enter a new frame that borrows the given bindings.
    pub fn push_borrowed(&mut self, bindings: &'data HashMap<String, Value>) {
        self.push_frame(Cow::Borrowed(bindings));
    }

    fn push_frame(&mut self, bindings: Cow<'data, HashMap<String, Value>>) {
        self.frames.push(Frame {
            bindings,
            parent: Some(self.current),
        });
        self.current = self.frames.len() - 1;
    }

    /// Leave the current frame, discarding its bindings.
    ///
    /// The root frame is never left.
    pub fn pop(&mut self) {
        if let Some(parent) = self.frames.get(self.current).and_then(|frame| frame.parent) {
            self.frames.truncate(self.current);
            self.current = parent;
        }
    }

    /// Bind the name to the value in the current frame.
    ///
    /// A binding of the same name in a parent frame is shadowed until the
    /// current frame is left.
    pub fn define<T>(&mut self, name: T, value: Value)
    where
        T: Into<String>,
    {
        if let Some(frame) = self.frames.get_mut(self.current) {
            frame.bindings.to_mut().insert(name.into(), value);
        }
    }

    /// Return the nearest binding of the name, if any.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut index = Some(self.current);
        while let Some(frame) = index.and_then(|i| self.frames.get(i)) {
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            index = frame.parent;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::Scope;
    use crate::value::Value;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_walks_parents() {
        let root = HashMap::from([("a".to_owned(), Value::Integer(1))]);
        let store = HashMap::from([("b".to_owned(), Value::Integer(2))]);
        let mut scope = Scope::new(&root);
        scope.push_borrowed(&store);

        assert_eq!(scope.lookup("a"), Some(&Value::Integer(1)));
        assert_eq!(scope.lookup("b"), Some(&Value::Integer(2)));
        assert_eq!(scope.lookup("c"), None);
    }

    #[test]
    fn test_shadow_and_pop() {
        let root = HashMap::from([("item".to_owned(), Value::from("outer"))]);
        let mut scope = Scope::new(&root);

        scope.push();
        scope.define("item", Value::from("inner"));
        assert_eq!(scope.lookup("item"), Some(&Value::from("inner")));

        scope.pop();
        assert_eq!(scope.lookup("item"), Some(&Value::from("outer")));
    }

    #[test]
    fn test_define_does_not_write_through() {
        let root = HashMap::new();
        let mut scope = Scope::new(&root);
        scope.push();
        scope.define("x", Value::Null);
        scope.pop();
        scope.pop();

        assert_eq!(scope.lookup("x"), None);
        assert!(root.is_empty());
    }
}
