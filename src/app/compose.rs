use unicode_width::UnicodeWidthStr;

/// Message being composed, with a cursor counted in chars.
///
/// The text may span several lines; `cursor` always sits on a char boundary
/// between 0 and the char count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeBuffer {
    text: String,
    cursor: usize,
}

impl ComposeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Start of the cursor's line.
    pub fn move_home(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    /// End of the cursor's line.
    pub fn move_end(&mut self) {
        let rest = self
            .text
            .chars()
            .skip(self.cursor)
            .take_while(|c| *c != '\n')
            .count();
        self.cursor += rest;
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Line index and char column of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.byte_offset(self.cursor)];
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |current| current.chars().count());
        (line, col)
    }

    /// Display width of the cursor's line up to the cursor.
    pub fn cursor_display_col(&self) -> usize {
        let before = &self.text[..self.byte_offset(self.cursor)];
        before.rsplit('\n').next().map_or(0, UnicodeWidthStr::width)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// The cursor starts at the end of the given text.
impl From<&str> for ComposeBuffer {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }
}

impl PartialEq<&str> for ComposeBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
