/// Forward-only cursor over the raw text of a single shader file.
///
/// The offset never exceeds the text length and never moves backwards.
#[derive(Debug, Clone)]
pub struct ScanCursor<'a> {
    text: &'a [u8],
    offset: usize,
}

impl<'a> ScanCursor<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_eof(&self) -> bool {
        self.offset == self.text.len()
    }

    /// Byte under the cursor, `None` at the end of the text
    pub fn peek(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.text[self.offset..]
    }

    /// Text between two offsets previously observed on this cursor
    pub fn slice(&self, from: usize, to: usize) -> &'a [u8] {
        &self.text[from..to]
    }

    /// Moves forward `n` bytes, stopping at the end of the text
    pub fn advance(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.text.len());
    }

    pub fn matches_ahead(&self, literal: &[u8]) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Returns the number of whitespace bytes skipped
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.offset;
        while self.peek().is_some_and(is_space) {
            self.advance(1);
        }
        self.offset - start
    }

    /// Skips past the next newline, or to the end if there is none
    pub fn skip_line(&mut self) {
        while self.peek().is_some_and(|byte| byte != b'\n') {
            self.advance(1);
        }
        self.advance(1);
    }

    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_whitespace();

            if self.matches_ahead(b"//") {
                self.skip_line();
                continue;
            }

            if self.matches_ahead(b"/*") {
                self.advance(2);
                while !self.is_eof() && !self.matches_ahead(b"*/") {
                    self.advance(1);
                }
                // An unclosed block comment runs to the end of the text
                self.advance(2);
                continue;
            }

            break;
        }
    }

    /// Moves forward until `literal` is under the cursor, treating whitespace and comments as
    /// noise that can never contain a match. Returns `false` if the text ran out first.
    ///
    /// `literal` must not start with whitespace and must not contain `//`, `/*` or `*/`.
    /// It is meant for short needles like directive keywords or quote characters.
    pub fn seek_to_match(&mut self, literal: &[u8]) -> bool {
        debug_assert!(
            literal.first().map_or(true, |byte| !is_space(*byte)),
            "seek literal must not start with whitespace"
        );

        while !self.is_eof() && !self.matches_ahead(literal) {
            self.skip_whitespace_and_comments();

            if self.matches_ahead(literal) {
                break;
            }

            self.advance(1);
        }

        !self.is_eof()
    }
}

/// Same set as C `isspace` in the default locale
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}
