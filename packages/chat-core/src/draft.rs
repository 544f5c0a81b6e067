//! Composer draft buffer.
//!
//! The draft is the composer's only piece of local state. The cursor is a
//! byte offset that always sits on a char boundary; the max length counts
//! chars.

use crate::message::OutboundContent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftBuffer {
    text: String,
    cursor: usize,
    max_chars: usize,
}

impl DraftBuffer {
    /// Create a buffer seeded with `initial`, cursor at the end.
    pub fn new(initial: &str, max_chars: usize) -> Self {
        let text: String = initial.chars().take(max_chars).collect();
        Self {
            cursor: text.len(),
            text,
            max_chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the draft holds nothing but whitespace.
    pub fn trimmed_is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn remaining(&self) -> usize {
        self.max_chars.saturating_sub(self.text.chars().count())
    }

    /// Insert text at the cursor, truncated to the remaining budget.
    /// Returns false when nothing fit.
    pub fn insert(&mut self, text: &str) -> bool {
        let budget = self.remaining();
        let fitted: String = text.chars().take(budget).collect();
        if fitted.is_empty() {
            return false;
        }
        self.text.insert_str(self.cursor, &fitted);
        self.cursor += fitted.len();
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.insert(c.encode_utf8(&mut [0; 4]))
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.text.remove(prev);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.prev_boundary();
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.cursor = self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len());
        true
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Remove everything after the cursor.
    pub fn kill_to_end(&mut self) {
        self.text.truncate(self.cursor);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the whole draft, e.g. when the host resets it.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(self.max_chars).collect();
        self.cursor = self.text.len();
    }

    /// Package the draft for sending and clear it.
    ///
    /// Content is passed verbatim; trimming is only used for visibility.
    pub fn take_outbound(&mut self) -> OutboundContent {
        let content = std::mem::take(&mut self.text);
        self.cursor = 0;
        OutboundContent { content }
    }

    /// Text before and after the cursor, for rendering a caret.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_and_truncated() {
        let draft = DraftBuffer::new("hello", 3);
        assert_eq!(draft.text(), "hel");
        assert_eq!(draft.cursor(), 3);
    }

    #[test]
    fn test_insert_respects_max_chars() {
        let mut draft = DraftBuffer::new("", 4);
        assert!(draft.insert("héllo"));
        assert_eq!(draft.text(), "héll");
        assert!(!draft.insert_char('!'));
        assert_eq!(draft.text().chars().count(), 4);
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let mut draft = DraftBuffer::new("añb", 100);
        assert!(draft.move_left());
        assert!(draft.backspace());
        assert_eq!(draft.text(), "ab");
        assert_eq!(draft.cursor(), 1);

        assert!(draft.insert_char('🎉'));
        assert_eq!(draft.text(), "a🎉b");
        assert!(draft.move_left());
        assert_eq!(draft.cursor(), 1);
        assert!(draft.move_right());
        assert_eq!(draft.cursor(), 5);

        assert!(draft.delete());
        assert_eq!(draft.text(), "a🎉");
        assert!(!draft.delete());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut draft = DraftBuffer::new("ab", 10);
        assert!(!draft.move_right());
        draft.move_to_start();
        assert!(!draft.move_left());
        assert!(!draft.backspace());
        draft.move_right();
        draft.kill_to_end();
        assert_eq!(draft.text(), "a");
        draft.move_to_end();
        assert_eq!(draft.split_at_cursor(), ("a", ""));
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        let draft = DraftBuffer::new("  \n\t", 10);
        assert!(!draft.is_empty());
        assert!(draft.trimmed_is_empty());
    }

    #[test]
    fn test_take_outbound_resets() {
        let mut draft = DraftBuffer::new(" hi ", 10);
        let outbound = draft.take_outbound();
        assert_eq!(outbound, OutboundContent { content: " hi ".into() });
        assert!(draft.is_empty());
        assert_eq!(draft.cursor(), 0);
    }

    #[test]
    fn test_set_text() {
        let mut draft = DraftBuffer::new("", 2);
        draft.set_text("xyz");
        assert_eq!(draft.text(), "xy");
        assert_eq!(draft.cursor(), 2);
        draft.clear();
        assert!(draft.is_empty());
    }
}
