use crate::{compile::token::Kind, Marker};

/// Describes the mode of the Lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CursorState {
    /// Outside of any tag, reading content.
    Default,
    /// Inside of an expression.
    Expression,
    /// Inside of a statement.
    Statement,
}

impl CursorState {
    /// Return the [`Marker`] and [`Kind`] that close the current tag.
    ///
    /// Returns `None` when the cursor is outside of a tag.
    pub fn close(self) -> Option<(Marker, Kind)> {
        match self {
            CursorState::Default => None,
            CursorState::Expression => Some((Marker::EndExpression, Kind::ExpressionClose)),
            CursorState::Statement => Some((Marker::EndStatement, Kind::StatementClose)),
        }
    }
}
