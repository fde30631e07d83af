/// Matches a delimiter one character at a time.
///
/// Each character of content is fed to the [`Sequence`], which reports when
/// the final character of the delimiter has been seen. A mismatch falls back
/// to the longest prefix of the delimiter that is also a suffix of the text
/// seen so far, so overlapping input such as `{{{` still completes `{{`.
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Characters of the delimiter.
    pattern: Vec<char>,
    /// For each position, the length of the longest proper prefix of the
    /// pattern that is also a suffix ending at that position.
    fallback: Vec<usize>,
    /// Amount of characters matched so far.
    matched: usize,
}

impl Sequence {
    /// Create a new [`Sequence`] that matches the given delimiter.
    pub fn new(pattern: &str) -> Self {
        let pattern: Vec<char> = pattern.chars().collect();
        let mut fallback = vec![0; pattern.len()];
        let mut length = 0;

        for index in 1..pattern.len() {
            while length > 0 && pattern[index] != pattern[length] {
                length = fallback[length - 1];
            }
            if pattern[index] == pattern[length] {
                length += 1;
            }
            fallback[index] = length;
        }

        Self {
            pattern,
            fallback,
            matched: 0,
        }
    }

    /// Feed the next character to the [`Sequence`].
    ///
    /// Returns true when this character completes the delimiter.
    pub fn feed(&mut self, c: char) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        if self.matched == self.pattern.len() {
            self.matched = self.fallback[self.matched - 1];
        }
        while self.matched > 0 && self.pattern[self.matched] != c {
            self.matched = self.fallback[self.matched - 1];
        }
        if self.pattern[self.matched] == c {
            self.matched += 1;
        }

        self.matched == self.pattern.len()
    }

    /// Forget any partial match.
    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Return the length of the delimiter in characters.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }
}
