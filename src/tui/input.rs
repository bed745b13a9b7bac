/// Cursor over the todo text input. The text itself lives in the store's
/// `ui.text_input`; the editor mutates a working copy which the caller then
/// dispatches back as `SetTextInput`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineEditor {
    /// Byte offset, always on a char boundary.
    pub cursor: usize,
}

impl LineEditor {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_end(text: &str) -> Self {
        Self { cursor: text.len() }
    }

    /// Pulls the cursor back inside `text` if the text changed underneath it.
    pub fn clamp(&mut self, text: &str) {
        if self.cursor > text.len() {
            self.cursor = text.len();
        }
        while !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) {
        self.clamp(text);
        text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self, text: &mut String) {
        self.clamp(text);
        if let Some((prev, _)) = text[..self.cursor].char_indices().next_back() {
            text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self, text: &mut String) {
        self.clamp(text);
        if self.cursor < text.len() {
            text.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self, text: &str) {
        self.clamp(text);
        if let Some((prev, _)) = text[..self.cursor].char_indices().next_back() {
            self.cursor = prev;
        }
    }

    pub fn move_cursor_right(&mut self, text: &str) {
        self.clamp(text);
        if let Some(c) = text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self, text: &str) {
        self.cursor = text.len();
    }

    /// Ctrl+W: removes trailing whitespace before the cursor, then the word.
    pub fn delete_word_backward(&mut self, text: &mut String) {
        self.clamp(text);
        let before = &text[..self.cursor];
        let trimmed = before.trim_end();
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());

        text.replace_range(word_start..self.cursor, "");
        self.cursor = word_start;
    }

    pub fn split<'a>(&self, text: &'a str) -> (&'a str, &'a str) {
        let mut cursor = self.cursor.min(text.len());
        while !text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        text.split_at(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_char() {
        let mut text = String::new();
        let mut editor = LineEditor::new();

        editor.insert_char(&mut text, 'H');
        editor.insert_char(&mut text, 'i');
        assert_eq!(text, "Hi");
        assert_eq!(editor.cursor, 2);

        editor.move_cursor_home();
        editor.insert_char(&mut text, '>');
        assert_eq!(text, ">Hi");
        assert_eq!(editor.cursor, 1);
    }

    #[test]
    fn test_backspace() {
        let mut text = "Hello".to_string();
        let mut editor = LineEditor::at_end(&text);

        editor.backspace(&mut text);
        assert_eq!(text, "Hell");
        assert_eq!(editor.cursor, 4);

        editor.move_cursor_home();
        editor.backspace(&mut text);
        assert_eq!(text, "Hell");
    }

    #[test]
    fn test_delete() {
        let mut text = "Hello".to_string();
        let mut editor = LineEditor::new();

        editor.delete(&mut text);
        assert_eq!(text, "ello");
        assert_eq!(editor.cursor, 0);

        editor.move_cursor_end(&text);
        editor.delete(&mut text);
        assert_eq!(text, "ello");
    }

    #[test]
    fn test_cursor_movement_multibyte() {
        let text = "aé☑b".to_string();
        let mut editor = LineEditor::at_end(&text);

        editor.move_cursor_left(&text);
        assert_eq!(editor.split(&text), ("aé☑", "b"));
        editor.move_cursor_left(&text);
        assert_eq!(editor.split(&text), ("aé", "☑b"));
        editor.move_cursor_right(&text);
        assert_eq!(editor.split(&text), ("aé☑", "b"));

        editor.move_cursor_end(&text);
        editor.move_cursor_right(&text);
        assert_eq!(editor.cursor, text.len());
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut text = "añ".to_string();
        let mut editor = LineEditor::at_end(&text);

        editor.backspace(&mut text);
        assert_eq!(text, "a");
        assert_eq!(editor.cursor, 1);
    }

    #[test]
    fn test_delete_word_backward() {
        let mut text = "buy oat milk  ".to_string();
        let mut editor = LineEditor::at_end(&text);

        editor.delete_word_backward(&mut text);
        assert_eq!(text, "buy oat ");
        editor.delete_word_backward(&mut text);
        assert_eq!(text, "buy ");
        editor.delete_word_backward(&mut text);
        assert_eq!(text, "");
        editor.delete_word_backward(&mut text);
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn test_clamp_after_external_change() {
        let mut editor = LineEditor { cursor: 10 };
        editor.clamp("abc");
        assert_eq!(editor.cursor, 3);

        let mut editor = LineEditor { cursor: 2 };
        editor.clamp("é");
        assert_eq!(editor.cursor, 2);

        let mut editor = LineEditor { cursor: 1 };
        editor.clamp("é");
        assert_eq!(editor.cursor, 0);
    }
}
