use std::{
    cmp::max,
    fmt::{Formatter, Result},
};

use super::{
    super::{RESET, YELLOW},
    {get_width, Visual, BLANK, EQUAL, HIGHLIGHT, PIPE},
};
use crate::region::Region;

/// A type of `Visual` that points to a specific location within source text.
#[derive(Debug, PartialEq)]
pub struct Pointer {
    /// The line that the Pointer is pointing to.
    ///
    /// This number should be zero indexed.
    line: usize,
    /// The column that the Pointer is pointing to, counted in characters.
    ///
    /// This number should be zero indexed.
    column: usize,
    /// Display width of the text preceding the column on its line.
    offset: usize,
    /// The length of the object being highlighted.
    length: usize,
    /// The actual line of text that is being pointed to.
    text: String,
}

impl Pointer {
    /// Create a new Visual over the given source text and Region.
    ///
    /// A `Region` that extends past the source is clamped to the end of it.
    pub fn new(source: &str, region: Region) -> Self {
        let begin = floor_boundary(source, region.begin);
        let end = floor_boundary(source, max(begin, region.end));

        let line_start = source[..begin].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[begin..].find('\n').map_or(source.len(), |i| begin + i);
        let prefix = &source[line_start..begin];

        // Only the part of the region on the first line is underlined.
        let highlighted = &source[begin..end.min(line_end)];

        Self {
            line: source[..begin].matches('\n').count(),
            column: prefix.chars().count(),
            offset: get_width(prefix),
            length: max(1, get_width(highlighted)),
            text: source[line_start..line_end].trim_end_matches('\r').to_string(),
        }
    }
}

impl Visual for Pointer {
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
        color: bool,
    ) -> Result {
        let num = (self.line + 1).to_string();
        let col = self.column + 1;
        let pad = get_width(&num);
        let align = self.offset + self.length;

        let name = template.unwrap_or("?");
        let text = &self.text;
        let underline = HIGHLIGHT.repeat(self.length);
        let (open, close) = if color { (YELLOW, RESET) } else { ("", "") };

        write!(
            formatter,
            "\n {BLANK:pad$}--> {name}:{num}:{col}\
             \n {BLANK:pad$} {PIPE}\
             \n {num:>} {PIPE} {text}\
             \n {BLANK:pad$} {PIPE} {open}{underline:>align$}{close}\
             \n {BLANK:pad$} {PIPE}",
        )?;

        if let Some(help) = help {
            write!(formatter, "\n {BLANK:pad$} {EQUAL} help: {help}")?;
        }

        Ok(())
    }

    fn location(&self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

/// Return the largest char boundary in `source` that is not past `index`.
fn floor_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }

    index
}

#[cfg(test)]
mod tests {
    use super::Pointer;
    use crate::log::Visual;

    #[test]
    fn test_location_second_line() {
        let pointer = Pointer::new("hello\n{{ name ^ }}", (14..15).into());

        assert_eq!(pointer.location(), (2, 9));
        assert_eq!(pointer.text, "{{ name ^ }}");
    }

    #[test]
    fn test_location_end_of_input() {
        let source = "{{ var1";
        let pointer = Pointer::new(source, (source.len()..source.len()).into());

        assert_eq!(pointer.location(), (1, 8));
        assert_eq!(pointer.length, 1);
    }

    #[test]
    fn test_wide_characters() {
        let pointer = Pointer::new("日本 {{ ^ }}", (10..11).into());

        assert_eq!(pointer.column, 6);
        assert_eq!(pointer.offset, 8);
    }
}
