use serde::{Deserialize, Serialize};

/// Caret position in editor coordinates: 1-based line, 1-based character
/// column (column 1 is before the first character of the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Caret placed after the last character of `text`.
    pub fn end_of(text: &str) -> Self {
        let line = text.matches('\n').count() + 1;
        let last = text.rsplit('\n').next().unwrap_or_default();
        Self::new(line, last.chars().count() + 1)
    }

    /// Byte offset of the caret within `text`. Positions past the end of a
    /// line clamp to the line end; lines past the end clamp to the text end.
    pub fn offset(&self, text: &str) -> usize {
        let mut line_start = 0;
        for _ in 1..self.line.max(1) {
            match text[line_start..].find('\n') {
                Some(i) => line_start += i + 1,
                None => return text.len(),
            }
        }
        let line = &text[line_start..];
        let line_len = line.find('\n').unwrap_or(line.len());
        let column = self.column.saturating_sub(1);
        let within = line[..line_len]
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(line_len);
        line_start + within
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SELECT", Cursor::new(1, 1), 0)]
    #[case("SELECT", Cursor::new(1, 4), 3)]
    #[case("SELECT", Cursor::new(1, 99), 6)]
    #[case("a\nbc\nd", Cursor::new(2, 2), 3)]
    #[case("a\nbc\nd", Cursor::new(2, 9), 4)]
    #[case("a\nbc", Cursor::new(7, 1), 4)]
    #[case("é\nx", Cursor::new(1, 2), 2)]
    fn offsets(#[case] text: &str, #[case] cursor: Cursor, #[case] expected: usize) {
        assert_eq!(cursor.offset(text), expected);
    }

    #[test]
    fn end_of_text() {
        assert_eq!(Cursor::end_of("SELECT * FROM"), Cursor::new(1, 14));
        assert_eq!(Cursor::end_of("a\nbc"), Cursor::new(2, 3));
        let text = "x\n\ny";
        assert_eq!(Cursor::end_of(text).offset(text), text.len());
    }
}
