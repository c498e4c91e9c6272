use unicode_width::UnicodeWidthStr;

/// Search input state for the TUI
pub struct SearchState {
    pub query: String,
    /// Byte offset into `query`, always on a char boundary
    pub cursor_pos: usize,
    pub focused: bool,
    pub needs_search: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            focused: true,
            needs_search: false,
        }
    }
}

impl SearchState {
    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.query[self.cursor_pos..]
            .chars()
            .next()
            .map(|c| self.cursor_pos + c.len_utf8())
            .unwrap_or(self.query.len())
    }

    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.needs_search = true;
    }

    /// Append at the end, used when typing starts from the list
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.cursor_pos = self.query.len();
        self.needs_search = true;
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        self.needs_search = true;
    }

    pub fn delete(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.query.remove(self.cursor_pos);
            self.needs_search = true;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor_pos = self.next_boundary();
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Returns false when there was nothing to clear
    pub fn clear(&mut self) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.cursor_pos = 0;
        self.needs_search = true;
        true
    }

    /// Display column of the cursor (wide glyphs take two cells)
    pub fn cursor_column(&self) -> u16 {
        self.query[..self.cursor_pos].width() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SearchState {
        let mut state = SearchState::default();
        for c in text.chars() {
            state.insert_char(c);
        }
        state
    }

    #[test]
    fn typing_moves_cursor_and_requests_search() {
        let state = typed("aca");
        assert_eq!(state.query, "aca");
        assert_eq!(state.cursor_pos, 3);
        assert!(state.needs_search);
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut state = typed("café");
        state.backspace();
        assert_eq!(state.query, "caf");

        let mut state = typed("aéb");
        state.move_left();
        state.move_left();
        assert_eq!(state.cursor_pos, 1);
        state.delete();
        assert_eq!(state.query, "ab");
        state.move_right();
        assert_eq!(state.cursor_pos, 2);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut state = typed("wther");
        state.home();
        state.move_right();
        state.insert_char('e');
        state.insert_char('a');
        assert_eq!(state.query, "weather");
    }

    #[test]
    fn clear_reports_whether_anything_changed() {
        let mut state = SearchState::default();
        assert!(!state.clear());
        let mut state = typed("x");
        state.needs_search = false;
        assert!(state.clear());
        assert!(state.needs_search);
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut state = typed("日本");
        assert_eq!(state.cursor_column(), 4);
        state.end();
        state.move_left();
        assert_eq!(state.cursor_column(), 2);
    }
}
