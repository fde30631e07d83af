mod bound;
mod compare;
mod scope;

pub use self::compare::{compare, is_truthy, promote, to_float, to_integer, Target};

use self::{bound::Bounded, scope::Scope};
use crate::{
    compile::{
        token::Literal,
        tree::{Alternate, Call, Expression, ForLoop, IfElse, Member, Statement},
        Logical, Template,
    },
    log::{error_write, Error, UNDEFINED_FILTER},
    pipe::Pipe,
    value::{Origin, Tagged, Value},
    Engine, Store,
};
use std::borrow::Cow;

/// Walks the tree of a [`Template`] and writes its output.
///
/// Each `Renderer` owns its own [`Scope`], so one [`Engine`] may render any
/// amount of templates at once.
pub struct Renderer<'render, 'source> {
    /// An engine containing the registered filters and render settings.
    engine: &'render Engine,
    /// The template being rendered.
    template: &'render Template<'source>,
    /// Variable bindings, rooted at the engine filters.
    scope: Scope<'render>,
}

impl<'render, 'source> Renderer<'render, 'source> {
    /// Create a new Renderer.
    ///
    /// The root frame of the [`Scope`] holds the filters of the [`Engine`],
    /// and the frame above it holds the data of the [`Store`].
    pub fn new(
        engine: &'render Engine,
        template: &'render Template<'source>,
        store: &'render Store,
    ) -> Self {
        let mut scope = Scope::new(engine.filters());
        scope.push_borrowed(store.data());

        Self {
            engine,
            template,
            scope,
        }
    }

    /// Render the [`Template`] stored inside the [`Renderer`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a filter fails or cannot be found, or writing
    /// to the buffer fails.
    #[tracing::instrument(level = "debug", skip_all, fields(length = self.template.source.len()))]
    pub fn render(mut self) -> Result<String, Error> {
        let (engine, template) = (self.engine, self.template);
        let mut buffer = String::with_capacity(template.source.len());
        let mut pipe = Pipe::new(&mut buffer, engine.escape());

        self.render_statements(&template.program.statements, &mut pipe)?;
        tracing::trace!(length = buffer.len(), "rendered template");

        Ok(buffer)
    }

    fn render_statements(
        &mut self,
        statements: &[Statement],
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        for statement in statements {
            match statement {
                Statement::Content(region) => pipe
                    .write_text(region.literal(self.template.source), Origin::Source)
                    .map_err(|_| error_write())?,
                Statement::Output(output) => {
                    let tagged = self.evaluate(&output.expression)?;
                    pipe.write_value(&tagged).map_err(|_| error_write())?;
                }
                Statement::IfElse(if_else) => self.render_if(if_else, pipe)?,
                Statement::ForLoop(for_loop) => self.render_for(for_loop, pipe)?,
            }
        }

        Ok(())
    }

    /// Render the first branch whose condition is truthy, or the final
    /// else branch if there is one.
    fn render_if(&mut self, if_else: &IfElse, pipe: &mut Pipe) -> Result<(), Error> {
        let mut current = if_else;

        loop {
            if is_truthy(&self.evaluate(&current.condition)?.value) {
                if let Some(block) = &current.then_branch {
                    self.render_statements(&block.statements, pipe)?;
                }
                return Ok(());
            }

            match &current.else_branch {
                Some(Alternate::ElseIf(next)) => current = next.as_ref(),
                Some(Alternate::Else(block)) => {
                    return self.render_statements(&block.statements, pipe)
                }
                None => return Ok(()),
            }
        }
    }

    /// Render the loop over the elements of an array or the characters of
    /// a string. Only as many items as the loop limit allows are copied out
    /// of the iterable.
    fn render_for(&mut self, for_loop: &ForLoop, pipe: &mut Pipe) -> Result<(), Error> {
        // One past the limit, so the truncation is still observed.
        let take = self.engine.loop_limit().saturating_add(1);
        let items: Vec<Value> = match &*self.lookup(&for_loop.iterable)? {
            Value::Array(items) => items.iter().take(take).cloned().collect(),
            Value::String(text) => text
                .chars()
                .take(take)
                .map(|c| Value::String(c.into()))
                .collect(),
            other => {
                tracing::debug!(
                    variable = %for_loop.variable.name,
                    kind = other.kind(),
                    "skipping loop over value that is not iterable"
                );
                return Ok(());
            }
        };

        self.render_loop(for_loop, items.into_iter(), pipe)
    }

    /// Render the body of the loop once for each item, binding the item in
    /// a fresh frame each time.
    fn render_loop<I>(
        &mut self,
        for_loop: &ForLoop,
        items: I,
        pipe: &mut Pipe,
    ) -> Result<(), Error>
    where
        I: Iterator<Item = Value>,
    {
        let Some(body) = &for_loop.body else {
            return Ok(());
        };

        let limit = self.engine.loop_limit();
        let mut bounded = Bounded::new(items, limit);
        for item in bounded.by_ref() {
            self.scope.push();
            self.scope.define(for_loop.variable.name.as_str(), item);
            let result = self.render_statements(&body.statements, pipe);
            self.scope.pop();
            result?;
        }

        if bounded.is_truncated() {
            tracing::trace!(
                variable = %for_loop.variable.name,
                limit,
                "loop stopped at iteration limit"
            );
        }

        Ok(())
    }

    /// Evaluate an [`Expression`] to a [`Tagged`] value.
    ///
    /// Literals keep [`Origin::Source`], everything else is
    /// [`Origin::Host`].
    fn evaluate(&self, expression: &Expression) -> Result<Tagged, Error> {
        Ok(match expression {
            Expression::Literal(constant) => Tagged::source(literal(&constant.value)),
            Expression::Identifier(_) | Expression::Member(_) => {
                Tagged::host(self.lookup(expression)?.into_owned())
            }
            Expression::Array(array) => Tagged::host(Value::Array(
                array
                    .elements
                    .iter()
                    .map(|element| self.evaluate(element).map(|tagged| tagged.value))
                    .collect::<Result<_, _>>()?,
            )),
            Expression::Not(not) => {
                Tagged::host(Value::Boolean(!is_truthy(&*self.lookup(&not.operand)?)))
            }
            Expression::Compare(comparison) => {
                let left = self.lookup(&comparison.left)?;
                let right = self.lookup(&comparison.right)?;

                Tagged::host(Value::Boolean(compare(&left, comparison.operator, &right)))
            }
            Expression::Logical(combine) => {
                // Both sides are always evaluated.
                let left = is_truthy(&*self.lookup(&combine.left)?);
                let right = is_truthy(&*self.lookup(&combine.right)?);

                Tagged::host(Value::Boolean(match combine.operator {
                    Logical::And => left && right,
                    Logical::Or => left || right,
                }))
            }
            Expression::Call(call) => self.evaluate_call(call)?,
        })
    }

    /// Evaluate an [`Expression`] without copying the data it names.
    ///
    /// Identifiers and members borrow from the [`Scope`], anything else is
    /// evaluated to an owned value.
    fn lookup(&self, expression: &Expression) -> Result<Cow<'_, Value>, Error> {
        match expression {
            Expression::Identifier(identifier) => Ok(self.resolve(&identifier.name)),
            Expression::Member(member) => self.evaluate_member(member),
            expression => Ok(Cow::Owned(self.evaluate(expression)?.value)),
        }
    }

    /// Return the nearest binding of the name, or null when it is unbound.
    fn resolve(&self, name: &str) -> Cow<'_, Value> {
        match self.scope.lookup(name) {
            Some(value) => Cow::Borrowed(value),
            None => {
                tracing::debug!(name, "identifier is unbound, using null");
                Cow::Owned(Value::Null)
            }
        }
    }

    /// Evaluate a member access.
    ///
    /// A bare identifier on the right names the key directly, any other
    /// property is evaluated and converted to text. Access on anything but
    /// an object yields null.
    fn evaluate_member(&self, member: &Member) -> Result<Cow<'_, Value>, Error> {
        let object = self.lookup(&member.object)?;
        if !matches!(*object, Value::Object(_)) {
            return Ok(Cow::Owned(Value::Null));
        }

        let key = match member.property.as_ref() {
            Expression::Identifier(identifier) => Cow::Borrowed(identifier.name.as_str()),
            property => Cow::Owned(self.evaluate(property)?.value.to_string()),
        };

        Ok(match object {
            Cow::Borrowed(Value::Object(entries)) => entries
                .get(key.as_ref())
                .map_or(Cow::Owned(Value::Null), Cow::Borrowed),
            Cow::Owned(Value::Object(entries)) => {
                Cow::Owned(entries.get(key.as_ref()).cloned().unwrap_or_default())
            }
            _ => Cow::Owned(Value::Null),
        })
    }

    /// Invoke a filter.
    ///
    /// The first argument is the input, and the rest are passed on as the
    /// filter arguments.
    fn evaluate_call(&self, call: &Call) -> Result<Tagged, Error> {
        let source = self.template.source;
        let name = call.callee.region().literal(source);

        let Value::Function(function) = self.evaluate(&call.callee)?.value else {
            return Err(Error::render(format!("{UNDEFINED_FILTER} `{name}`"))
                .with_pointer(source, call.callee.region())
                .with_help(format!(
                    "register a filter named `{name}` with the engine before rendering"
                )));
        };

        let (input, rest) = match call.arguments.split_first() {
            Some((first, rest)) => (
                self.lookup(first)?,
                rest.iter()
                    .map(|argument| self.evaluate(argument).map(|tagged| tagged.value))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => (Cow::Owned(Value::Null), Vec::new()),
        };

        tracing::trace!(filter = name, arguments = rest.len(), "applying filter");
        let output = function.apply(&input, &rest).map_err(|error| {
            if error.has_visual() {
                error
            } else {
                error.with_pointer(source, call.callee.region())
            }
        })?;

        Ok(Tagged::host(output.normalize()))
    }
}

/// Convert a scanned [`Literal`] into a [`Value`].
fn literal(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(boolean) => Value::Boolean(*boolean),
        Literal::Integer(integer) => Value::Integer(*integer),
        Literal::Float(float) => Value::Float(*float),
        Literal::String(string) => Value::String(string.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        filter::{Error, ErrorKind, Value},
        Engine, Origin, Store,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(engine: &Engine, source: &str, store: &Store) -> Result<String, Error> {
        let template = engine.compile(source)?;

        engine.render(&template, store)
    }

    #[test]
    fn test_render_content_only() {
        let output = render(&Engine::default(), "plain text", &Store::new());

        assert_eq!(output.unwrap(), "plain text");
    }

    #[test]
    fn test_render_unbound_is_empty() {
        let output = render(&Engine::default(), "[{{ missing }}]", &Store::new());

        assert_eq!(output.unwrap(), "[]");
    }

    #[test]
    fn test_render_elif_chain() {
        let source = "{% if n == 1 %}one{% elif n == 2 %}two{% else %}many{% endif %}";
        let engine = Engine::default();

        for (n, expect) in [(1, "one"), (2, "two"), (3, "many")] {
            let store = Store::new().with_must("n", n);
            assert_eq!(render(&engine, source, &store).unwrap(), expect);
        }
    }

    #[test]
    fn test_render_loop_restores_scope() {
        let source = "{% for item in items %}{{ item }},{% endfor %}{{ item }}";
        let store = Store::new()
            .with_must("items", json!(["a", "b"]))
            .with_must("item", "outer");

        assert_eq!(render(&Engine::default(), source, &store).unwrap(), "a,b,outer");
    }

    #[test]
    fn test_render_loop_limit() {
        let source = "{% for c in text %}{{ c }}{% endfor %}";
        let engine = Engine::default().with_loop_limit(3);
        let store = Store::new().with_must("text", "abcdef");

        assert_eq!(render(&engine, source, &store).unwrap(), "abc");
    }

    #[test]
    fn test_render_loop_over_non_iterable() {
        let source = "[{% for x in n %}{{ x }}{% endfor %}]";
        let store = Store::new().with_must("n", 5);

        assert_eq!(render(&Engine::default(), source, &store).unwrap(), "[]");
    }

    #[test]
    fn test_render_computed_member() {
        let store = Store::new()
            .with_must("user", json!({ "name": "taylor", "3": "three" }))
            .with_must("key", "name");

        assert_eq!(
            render(&Engine::default(), "{{ user.(key) }} {{ user.(3) }}", &store).unwrap(),
            "taylor three"
        );
    }

    #[test]
    fn test_render_member_in_large_loop() {
        let people = (0..10_000)
            .map(|n| json!({ "name": format!("p{n}"), "meta": { "age": n } }))
            .collect::<Vec<_>>();
        let store = Store::new()
            .with_must("people", people)
            .with_must("site", json!({ "title": "roster" }));
        let source = "{% for p in people %}{{ p.name }}:{{ p.meta.age }}@{{ site.title }};{% endfor %}";
        let output = render(&Engine::default(), source, &store).unwrap();

        assert_eq!(output.matches(';').count(), 50);
        assert!(output.starts_with("p0:0@roster;p1:1@roster;"));
        assert!(output.ends_with("p49:49@roster;"));
    }

    #[test]
    fn test_render_member_of_filter_result() {
        let wrap = |input: &Value, _: &[Value]| -> Result<Value, Error> {
            Ok(Value::Object([("inner".to_owned(), input.clone())].into()))
        };
        let engine = Engine::default().with_filter_must("wrap", wrap);
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(
            render(&engine, "[{{ (name | wrap).inner }}][{{ (name | wrap).other }}]", &store)
                .unwrap(),
            "[taylor][]"
        );
    }

    #[test]
    fn test_render_escape_origin() {
        let engine = Engine::default().with_escape(|text: &str, origin: Origin| match origin {
            Origin::Source => text.to_owned(),
            Origin::Host => format!("<{text}>"),
        });
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(
            render(&engine, "hi {{ name }} {{ \"lit\" }}", &store).unwrap(),
            "hi <taylor> lit"
        );
    }

    #[test]
    fn test_render_undefined_filter() {
        let error = render(&Engine::default(), "{{ name | nope }}", &Store::new()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Render);
        assert_eq!(error.reason(), "call to undefined filter `nope`");
        assert_eq!(error.column(), Some(11));
    }

    #[test]
    fn test_render_filter_result_nan() {
        let nan = |_: &Value, _: &[Value]| -> Result<Value, Error> { Ok(Value::Float(f64::NAN)) };
        let engine = Engine::default().with_filter_must("nan", nan);
        let source = "{% if (x | nan) == (x | nan) %}eq{% else %}ne{% endif %}";
        let output = render(&engine, source, &Store::new());

        assert_eq!(output.unwrap(), "ne");
    }
}
