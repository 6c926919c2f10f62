/// Search field text with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    cursor: usize,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor.min(char_count(&self.text))
    }

    /// Replaces the text and parks the cursor at its end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = char_count(&self.text);
    }

    pub fn insert(&mut self, ch: char) {
        let pos = self.cursor();
        let byte_pos = byte_index_at_char(&self.text, pos);
        self.text.insert(byte_pos, ch);
        self.cursor = pos + 1;
    }

    pub fn backspace(&mut self) -> bool {
        let pos = self.cursor();
        if pos == 0 {
            return false;
        }
        let byte_pos = byte_index_at_char(&self.text, pos - 1);
        self.text.remove(byte_pos);
        self.cursor = pos - 1;
        true
    }

    pub fn delete(&mut self) -> bool {
        let pos = self.cursor();
        if pos >= char_count(&self.text) {
            return false;
        }
        let byte_pos = byte_index_at_char(&self.text, pos);
        self.text.remove(byte_pos);
        true
    }

    pub fn delete_word_left(&mut self) -> bool {
        let mut chars: Vec<char> = self.text.chars().collect();
        let pos = self.cursor();
        let mut start = pos;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        if start == pos {
            return false;
        }
        chars.drain(start..pos);
        self.text = chars.into_iter().collect();
        self.cursor = start;
        true
    }

    pub fn move_left(&mut self) -> bool {
        let pos = self.cursor();
        if pos == 0 {
            return false;
        }
        self.cursor = pos - 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        let pos = self.cursor();
        if pos >= char_count(&self.text) {
            return false;
        }
        self.cursor = pos + 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.cursor() != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = char_count(&self.text);
        let moved = self.cursor() != end;
        self.cursor = end;
        moved
    }

    /// Display columns before the cursor.
    pub fn cursor_width(&self) -> usize {
        let byte_pos = byte_index_at_char(&self.text, self.cursor());
        unicode_width::UnicodeWidthStr::width(&self.text[..byte_pos])
    }
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::QueryInput;

    #[test]
    fn insert_and_backspace_follow_cursor() {
        let mut query = QueryInput::new();
        for ch in "avo".chars() {
            query.insert(ch);
        }
        assert!(query.move_left());
        query.insert('x');
        assert_eq!(query.text(), "avxo");
        assert!(query.backspace());
        assert_eq!(query.text(), "avo");
        assert_eq!(query.cursor(), 2);
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut query = QueryInput::new();
        query.set("fig");
        assert!(!query.delete());
        query.move_home();
        assert!(query.delete());
        assert_eq!(query.text(), "ig");
    }

    #[test]
    fn delete_word_left_stops_at_whitespace() {
        let mut query = QueryInput::new();
        query.set("united king");
        assert!(query.delete_word_left());
        assert_eq!(query.text(), "united ");
        assert!(query.delete_word_left());
        assert_eq!(query.text(), "");
        assert!(!query.delete_word_left());
    }

    #[test]
    fn handles_multibyte_text() {
        let mut query = QueryInput::new();
        query.set("café");
        assert!(query.backspace());
        assert_eq!(query.text(), "caf");
        query.insert('é');
        assert_eq!(query.cursor_width(), 4);
    }
}
