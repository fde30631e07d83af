/// States of the string scanner.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StringState {
    /// Reading ordinary characters.
    Begin,
    /// Read a `\` and the next character is escaped.
    Escape,
    /// Read the closing quote.
    Done,
}

impl StringState {
    /// Return the state following this one after reading the given character,
    /// and the character that should be appended to the string, if any.
    ///
    /// `quote` is the character that opened the string.
    pub fn next(self, c: char, quote: char) -> (Self, Option<char>) {
        match self {
            Self::Begin if c == quote => (Self::Done, None),
            Self::Begin if c == '\\' => (Self::Escape, None),
            Self::Begin => (Self::Begin, Some(c)),
            Self::Escape => {
                let escaped = match c {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    c => c,
                };

                (Self::Begin, Some(escaped))
            }
            Self::Done => (Self::Done, None),
        }
    }
}
