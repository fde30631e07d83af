use crate::{
    compile::{compile, Template},
    filter::{builtin, Filter},
    log::{Error, ErrorKind, INVALID_FILTER},
    pipe::{Escape, Identity},
    render::Renderer,
    value::{Function, Value},
    Store, Syntax,
};
use std::{collections::HashMap, sync::Arc};

/// The amount of iterations a single loop runs before it stops.
pub const DEFAULT_LOOP_LIMIT: usize = 50;

/// Facilitates compiling and rendering templates, and provides storage
/// for filters.
///
/// An `Engine` is immutable while rendering, so a shared reference may be
/// used to render from any amount of threads.
#[derive(Clone)]
pub struct Engine {
    /// Delimiters used when compiling templates.
    syntax: Syntax,
    /// Filters that this engine is aware of, stored as functions so they
    /// can be bound in the root frame of each render.
    filters: HashMap<String, Value>,
    /// The amount of iterations a single loop runs before it stops.
    loop_limit: usize,
    /// Applied to each fragment of output.
    escape: Arc<dyn Escape>,
}

impl Engine {
    /// Create a new [`Engine`] without any filters.
    ///
    /// Use [`Engine::default`] to start with the built-in filters.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Engine;
    ///
    /// let engine = Engine::empty();
    /// assert!(engine.get_filter("upcase").is_none());
    /// ```
    pub fn empty() -> Self {
        Self {
            syntax: Syntax::default(),
            filters: HashMap::new(),
            loop_limit: DEFAULT_LOOP_LIMIT,
            escape: Arc::new(Identity),
        }
    }

    /// Set the [`Syntax`] used to compile templates.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Builder, Engine, Store};
    ///
    /// let syntax = Builder::new().with_expression("((", "))").to_syntax().unwrap();
    /// let engine = Engine::default().with_syntax(syntax);
    /// let template = engine.compile("hello, (( name ))!").unwrap();
    /// let result = engine.render(&template, &Store::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!");
    /// ```
    #[inline]
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Set the amount of iterations a single loop runs before it stops.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_loop_limit(mut self, limit: usize) -> Self {
        self.loop_limit = limit;
        self
    }

    /// Set the [`Escape`] applied to each fragment of output.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_escape<T>(mut self, escape: T) -> Self
    where
        T: Escape + 'static,
    {
        self.escape = Arc::new(escape);
        self
    }

    /// Return the [`Syntax`] used to compile templates.
    #[inline]
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Return the amount of iterations a single loop runs before it stops.
    #[inline]
    pub fn loop_limit(&self) -> usize {
        self.loop_limit
    }

    /// Compile a new [`Template`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which most likely means the source
    /// contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Engine;
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("hello, {{ name }}!");
    /// assert!(template.is_ok());
    /// ```
    #[inline]
    pub fn compile<'source>(&self, text: &'source str) -> Result<Template<'source>, Error> {
        compile(text, &self.syntax)
    }

    /// Render a [`Template`] with the given [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if rendering fails, which may happen when a [`Filter`] returns
    /// an `Error` itself, or the template calls a filter that does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Engine, Store};
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("hello, {{ name | upcase }}!").unwrap();
    /// let result = engine.render(&template, &Store::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "hello, TAYLOR!")
    /// ```
    #[inline]
    pub fn render(&self, template: &Template, store: &Store) -> Result<String, Error> {
        Renderer::new(self, template, store).render()
    }

    /// Compile and render the text in one step.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if either compiling or rendering fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Engine, Store};
    ///
    /// let result = Engine::default().parse_and_render("{{ 1 < 2 }}", &Store::new());
    /// assert_eq!(result.unwrap(), "1");
    /// ```
    pub fn parse_and_render(&self, text: &str, store: &Store) -> Result<String, Error> {
        let template = self.compile(text)?;

        self.render(&template, store)
    }

    /// Add a [`Filter`].
    ///
    /// # Errors
    ///
    /// If a `Filter` with the given name already exists in the engine, an [`Error`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{filter::{Error, Value}, Engine};
    ///
    /// fn shout(value: &Value, _: &[Value]) -> Result<Value, Error> {
    ///     Ok(format!("{value}!").into())
    /// }
    ///
    /// let mut engine = Engine::default();
    /// assert!(engine.add_filter("shout", shout).is_ok());
    /// assert!(engine.add_filter("shout", shout).is_err());
    /// ```
    pub fn add_filter<T>(&mut self, name: &str, filter: T) -> Result<(), Error>
    where
        T: Filter + 'static,
    {
        if self.filters.contains_key(name) {
            return Err(Error::build(INVALID_FILTER)
                .with_kind(ErrorKind::Config)
                .with_help(format!(
                    "filter with name `{name}` already exists in engine, \
                    overwrite it with `.add_filter_must`"
                )));
        }

        self.add_filter_must(name, filter);
        Ok(())
    }

    /// Add a [`Filter`].
    ///
    /// If a `Filter` with the given name already exists in the [`Engine`], it is overwritten.
    #[inline]
    pub fn add_filter_must<T>(&mut self, name: &str, filter: T)
    where
        T: Filter + 'static,
    {
        tracing::debug!(name, "registering filter");
        self.filters
            .insert(name.to_owned(), Value::Function(Function::new(filter)));
    }

    /// Register a [`Filter`], overwriting any existing filter with the same
    /// name.
    ///
    /// The filter is visible to every later render, including templates that
    /// were compiled before it was registered.
    #[inline]
    pub fn register_filter<T>(&mut self, name: &str, filter: T)
    where
        T: Filter + 'static,
    {
        self.add_filter_must(name, filter);
    }

    /// Add a [`Filter`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// If a `Filter` with the given name already exists in the engine, an [`Error`] is returned.
    #[inline]
    pub fn with_filter<T>(mut self, name: &str, filter: T) -> Result<Self, Error>
    where
        T: Filter + 'static,
    {
        self.add_filter(name, filter)?;
        Ok(self)
    }

    /// Add a [`Filter`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// If a `Filter` with the given name already exists in the engine, it is overwritten.
    #[inline]
    pub fn with_filter_must<T>(mut self, name: &str, filter: T) -> Self
    where
        T: Filter + 'static,
    {
        self.add_filter_must(name, filter);
        self
    }

    /// Return the filter with the given name, if it exists in Engine.
    #[inline]
    pub fn get_filter(&self, name: &str) -> Option<&Function> {
        match self.filters.get(name) {
            Some(Value::Function(function)) => Some(function),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn filters(&self) -> &HashMap<String, Value> {
        &self.filters
    }

    #[inline]
    pub(crate) fn escape(&self) -> &dyn Escape {
        self.escape.as_ref()
    }
}

/// Creates an [`Engine`] with the built-in filters registered.
impl Default for Engine {
    fn default() -> Self {
        let mut engine = Self::empty();
        for (name, filter) in builtin::all() {
            engine.add_filter_must(name, filter);
        }

        engine
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        engine::Engine,
        filter::{Error, Value},
        ErrorKind, Store,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add() {
        let mut engine = Engine::default();
        engine.add_filter_must("faux", faux_filter_a);

        assert!(engine.get_filter("faux").is_some());
        assert!(engine.get_filter("ghost").is_none())
    }

    #[test]
    fn test_add_fluent() {
        assert!(Engine::default()
            .with_filter("faux", faux_filter_a)
            .unwrap()
            .get_filter("faux")
            .is_some());
        assert!(Engine::default().get_filter("ghost").is_none());
    }

    #[test]
    fn test_add_duplicate() {
        assert!(Engine::default()
            .with_filter_must("faux", faux_filter_a)
            .with_filter("faux", faux_filter_a)
            .is_err());
        assert!(Engine::default().with_filter("upcase", faux_filter_a).is_err());

        let mut engine = Engine::default();
        let error = engine.add_filter("downcase", faux_filter_a).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_add_overwrite() {
        let mut engine = Engine::default().with_filter_must("faux", faux_filter_a);
        assert!(engine
            .get_filter("faux")
            .is_some_and(|f| f.apply(&Value::Null, &[]).is_ok_and(|v| v == Value::from("a"))));

        engine.add_filter_must("faux", faux_filter_b);
        assert!(engine
            .get_filter("faux")
            .is_some_and(|f| f.apply(&Value::Null, &[]).is_ok_and(|v| v == Value::from("b"))));
    }

    #[test]
    fn test_builtins_registered() {
        let engine = Engine::default();

        for name in ["capitalize", "date", "default", "downcase", "titlecase", "upcase"] {
            assert!(engine.get_filter(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_register_after_compile() {
        let mut engine = Engine::default();
        let template = engine.compile("{{ name | faux }}").unwrap();
        assert!(engine.render(&template, &Store::new()).is_err());

        engine.register_filter("faux", faux_filter_b);
        assert_eq!(engine.render(&template, &Store::new()).unwrap(), "b");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Engine>();
    }

    /// A Filter used to test Engine.
    fn faux_filter_a(_: &Value, _: &[Value]) -> Result<Value, Error> {
        Ok(Value::String("a".into()))
    }

    /// A Filter used to test Engine.
    fn faux_filter_b(_: &Value, _: &[Value]) -> Result<Value, Error> {
        Ok(Value::String("b".into()))
    }
}
