use super::tree::Program;

/// A compiled [`Template`] that can be rendered with a `Store`.
///
/// The tree is read-only once compiled, so one `Template` may be rendered
/// any number of times, from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<'source> {
    /// The Abstract Syntax Tree generated during compilation.
    pub program: Program,
    /// Reference to the source data from which this [`Template`] was generated.
    pub source: &'source str,
}
