use crate::{
    compile::{token::Literal, Logical, Operator},
    region::Region,
};

/// The root of the Abstract Syntax Tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Statements rendered in order.
    pub statements: Vec<Statement>,
}

/// A non-empty sequence of statements nested within a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub region: Region,
}

/// A unit of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Raw text, rendered verbatim.
    Content(Region),
    /// Render the value of an expression.
    Output(Output),
    /// An if statement, possibly with elif and else branches.
    IfElse(IfElse),
    /// A for loop.
    ForLoop(ForLoop),
}

impl Statement {
    /// Get the Region from the underlying Statement kind.
    pub fn region(&self) -> Region {
        match self {
            Statement::Content(region) => *region,
            Statement::Output(output) => output.region,
            Statement::IfElse(if_else) => if_else.region,
            Statement::ForLoop(for_loop) => for_loop.region,
        }
    }
}

/// Represents a call to render some kind of Expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub expression: Expression,
    pub region: Region,
}

/// Conditional rendering statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    /// Decides which branch is rendered.
    pub condition: Expression,
    /// Rendered when the condition is truthy, absent when empty.
    pub then_branch: Option<Block>,
    /// Rendered when the condition is falsy, absent when there is no
    /// `elif` or `else` or when the else branch is empty.
    pub else_branch: Option<Alternate>,
    pub region: Region,
}

/// The branch of an [`IfElse`] taken when the condition is falsy.
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate {
    /// Another condition introduced by `elif`.
    ElseIf(Box<IfElse>),
    /// The statements after `else`.
    Else(Block),
}

/// Loop rendering statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// Name bound to each element.
    pub variable: Identifier,
    /// Expression producing the elements.
    pub iterable: Expression,
    /// Rendered once per element, absent when empty.
    pub body: Option<Block>,
    pub region: Region,
}

/// Represents data within tags that evaluates to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal data that does not need to be evaluated any further.
    Literal(Constant),
    /// Name that is resolved through the scope chain.
    Identifier(Identifier),
    /// Access a property of an object, `person.name`.
    Member(Member),
    /// List of expressions, `[1, 2, 3]`.
    Array(Array),
    /// Boolean negation, `!name`.
    Not(Not),
    /// Comparison between two expressions.
    Compare(Compare),
    /// Logical combination of two expressions.
    Logical(Combine),
    /// Application of a filter, `name | upcase`.
    Call(Call),
}

impl Expression {
    /// Get the Region from the underlying Expression kind.
    pub fn region(&self) -> Region {
        match self {
            Expression::Literal(constant) => constant.region,
            Expression::Identifier(identifier) => identifier.region,
            Expression::Member(member) => member.region,
            Expression::Array(array) => array.region,
            Expression::Not(not) => not.region,
            Expression::Compare(compare) => compare.region,
            Expression::Logical(combine) => combine.region,
            Expression::Call(call) => call.region,
        }
    }
}

/// A literal value located directly in the template source.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: Literal,
    pub region: Region,
}

/// Area that contains an identifying value.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub object: Box<Expression>,
    /// Usually an [`Identifier`], whose name is the key.
    pub property: Box<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub elements: Vec<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    pub operand: Box<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub operator: Operator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combine {
    pub operator: Logical,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub region: Region,
}

/// Call to some registered function.
///
/// The receiver of the pipe is always the first argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Expression that must evaluate to a function.
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub region: Region,
}
