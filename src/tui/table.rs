/// Selection and scrolling over the card list
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    /// Cards that fit on screen, updated on every draw
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 5,
        }
    }
}

impl TableState {
    /// Select the first card of a freshly filtered list
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.selected = None;
            self.scroll_offset = 0;
            return;
        }
        let i = self.selected.unwrap_or(0).min(total - 1);
        self.selected = Some(i);
        self.scroll_offset = self.scroll_offset.min(total - 1);
        self.ensure_visible(i);
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.max(1);
        let i = match self.selected {
            Some(i) => (i + jump).min(total - 1),
            None => jump.min(total - 1),
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.max(1);
        let i = self.selected.map(|i| i.saturating_sub(jump)).unwrap_or(0);
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index + 1 - self.visible_rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_scrolls_when_leaving_the_window() {
        let mut table = TableState {
            visible_rows: 3,
            ..Default::default()
        };
        table.reset(10);
        for _ in 0..3 {
            table.select_next(10);
        }
        assert_eq!(table.selected, Some(3));
        assert_eq!(table.scroll_offset, 1);

        table.select_last(10);
        assert_eq!(table.scroll_offset, 7);
        table.select_next(10);
        assert_eq!(table.selected, Some(9));
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut table = TableState {
            visible_rows: 4,
            ..Default::default()
        };
        table.reset(6);
        table.page_down(6);
        assert_eq!(table.selected, Some(4));
        table.page_down(6);
        assert_eq!(table.selected, Some(5));
        table.page_up();
        assert_eq!(table.selected, Some(1));
        table.page_up();
        assert_eq!(table.selected, Some(0));
        assert_eq!(table.scroll_offset, 0);
    }

    #[test]
    fn clamp_follows_a_shrinking_list() {
        let mut table = TableState::default();
        table.reset(10);
        table.select_last(10);
        table.clamp(2);
        assert_eq!(table.selected, Some(1));
        assert!(table.scroll_offset <= 1);
        table.clamp(0);
        assert_eq!(table.selected, None);
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut table = TableState::default();
        table.reset(0);
        table.select_next(0);
        table.select_first(0);
        assert_eq!(table.selected, None);
    }
}
