/// States of the number scanner.
///
/// A number begins in [`NumberState::Zero`], [`NumberState::Integer`] or,
/// for literals such as `.5`, [`NumberState::DecimalBegin`]. Each character
/// moves the machine with [`NumberState::next`] until it reaches
/// [`NumberState::Done`], at which point the previous state decides what
/// kind of literal was read.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NumberState {
    /// Reading decimal digits.
    Integer,
    /// Read a leading `0`, which may begin a hexadecimal literal.
    Zero,
    /// Read a `.` and expecting a digit.
    DecimalBegin,
    /// Reading digits after the `.`.
    Decimal,
    /// Read an `e` or `E` and expecting a sign or digit.
    ExponentBegin,
    /// Read the sign of an exponent and expecting a digit.
    SignedExponentBegin,
    /// Reading exponent digits.
    Exponent,
    /// Read `0x` and expecting a hexadecimal digit.
    HexBegin,
    /// Reading hexadecimal digits.
    Hex,
    /// The previous character was the last character of the number.
    Done,
}

impl NumberState {
    /// Return the state that the number scanner begins in for the given
    /// character, if it can begin a number at all.
    pub fn start(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Zero),
            '1'..='9' => Some(Self::Integer),
            '.' => Some(Self::DecimalBegin),
            _ => None,
        }
    }

    /// Return the state following this one after reading the given character.
    pub fn next(self, c: char) -> Self {
        match (self, c) {
            (Self::Zero, 'x' | 'X') => Self::HexBegin,
            (Self::Zero | Self::Integer, '0'..='9') => Self::Integer,
            (Self::Zero | Self::Integer, '.') => Self::DecimalBegin,
            (Self::Zero | Self::Integer | Self::Decimal, 'e' | 'E') => Self::ExponentBegin,
            (Self::DecimalBegin | Self::Decimal, '0'..='9') => Self::Decimal,
            (Self::ExponentBegin, '+' | '-') => Self::SignedExponentBegin,
            (Self::ExponentBegin | Self::SignedExponentBegin | Self::Exponent, '0'..='9') => {
                Self::Exponent
            }
            (Self::HexBegin | Self::Hex, c) if c.is_ascii_hexdigit() => Self::Hex,
            _ => Self::Done,
        }
    }

    /// Return true if the number may not end in this state.
    pub fn is_incomplete(self) -> bool {
        matches!(
            self,
            Self::HexBegin | Self::ExponentBegin | Self::SignedExponentBegin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::NumberState;

    fn run(text: &str) -> NumberState {
        let mut chars = text.chars();
        let mut state = chars.next().and_then(NumberState::start).unwrap();
        for c in chars {
            match state.next(c) {
                NumberState::Done => break,
                next => state = next,
            }
        }
        state
    }

    #[test]
    fn test_integer() {
        assert_eq!(run("123"), NumberState::Integer);
        assert_eq!(run("0"), NumberState::Zero);
        assert_eq!(run("42 "), NumberState::Integer);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(run("3.14"), NumberState::Decimal);
        assert_eq!(run(".5"), NumberState::Decimal);
        assert_eq!(run("5."), NumberState::DecimalBegin);
    }

    #[test]
    fn test_exponent() {
        assert_eq!(run("1e10"), NumberState::Exponent);
        assert_eq!(run("1.5E-3"), NumberState::Exponent);
        assert_eq!(run("0e5"), NumberState::Exponent);
        assert!(run("1e").is_incomplete());
        assert!(run("1e+").is_incomplete());
    }

    #[test]
    fn test_hex() {
        assert_eq!(run("0xFF"), NumberState::Hex);
        assert!(run("0x").is_incomplete());
        assert_eq!(run("0xfg"), NumberState::Hex);
    }
}
