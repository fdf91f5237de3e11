/// Source location information for error reporting
///
/// Line and column numbers are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Character offset from the beginning of the source text
    offset: usize,
    /// Line number where the error occurred (1-indexed)
    line: usize,
    /// Column number where the error occurred (1-indexed)
    column: usize,
    /// Optional length of the error span in characters
    length: Option<usize>,
    /// The source line content where the error occurred
    line_source: String,
}

impl ErrorLocation {
    /// Creates a new error location from source content and position information
    fn new(source: &str, offset: usize, length: Option<usize>) -> Self {
        // the offset may sit just past the last character (an error at the
        // end of input), so clamp rather than reject it
        let offset = offset.min(source.len());
        let length = length
            .filter(|length| *length > 0)
            .map(|length| length.min(source.len() - offset).max(1));

        let line_start = source[..offset]
            .rfind('\n')
            .map_or(0, |newline_idx| newline_idx + 1);

        let column = source[line_start..offset].chars().count() + 1;

        let line = source[..offset].chars().filter(|c| *c == '\n').count() + 1;

        let line_source = source
            .lines()
            .nth(line - 1)
            .unwrap_or_default()
            .replace('\t', "    ");

        Self {
            offset,
            line,
            column,
            length,
            line_source,
        }
    }

    /// Creates a new error location from source content and offset
    #[must_use]
    pub fn from_source_and_offset(source: &str, offset: usize) -> Self {
        Self::new(source, offset, None)
    }

    /// Creates a new error location from source content and span
    #[must_use]
    pub fn from_source_and_span(source: &str, offset: usize, length: usize) -> Self {
        Self::new(source, offset, Some(length))
    }

    /// Returns the character offset from the beginning of the source text
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the line number where the error occurred (1-indexed)
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number where the error occurred (1-indexed)
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns the length of the error span in characters
    #[must_use]
    pub fn length(&self) -> usize {
        // if no length is provided, assume a single character
        self.length.unwrap_or(1)
    }

    /// Returns the source line content where the error occurred
    #[must_use]
    pub fn line_source(&self) -> &str {
        &self.line_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_offset() {
        let location = ErrorLocation::from_source_and_offset("dV/dt = -V/", 11);

        assert_eq!(location.line(), 1);
        assert_eq!(location.column(), 12);
        assert_eq!(location.line_source(), "dV/dt = -V/");
    }

    #[test]
    fn second_line_offset() {
        let source = "A := 1\nB := (2";
        let location = ErrorLocation::from_source_and_span(source, 12, 1);

        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 6);
        assert_eq!(location.length(), 1);
        assert_eq!(location.line_source(), "B := (2");
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let location = ErrorLocation::from_source_and_offset("x +", 10);

        assert_eq!(location.offset(), 3);
        assert_eq!(location.column(), 4);
    }
}
