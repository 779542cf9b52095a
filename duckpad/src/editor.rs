//! Multi-line text buffer backing the editor panel.
//!
//! The buffer is the only source of document content. After every edit the
//! main loop converts it to a `duckpad_core::Document` (one block per line)
//! and hands that to the change monitor.
//!
//! Cursor columns are counted in `char`s, never bytes.

use duckpad_core::{Document, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self { lines: vec![String::new()], row: 0, col: 0 }
    }
}

/// Byte offset of the `col`-th char of `line`, or `line.len()` past the end.
fn byte_idx(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl TextBuffer {
    /// Builds a buffer from `text`; the cursor starts at the top.
    ///
    /// Tabs are expanded to four spaces so every char is one cell wide.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(|l| l.replace('\t', "    ")).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines, row: 0, col: 0 }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor position as (row, char column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn current(&self) -> &String {
        &self.lines[self.row]
    }

    fn current_mut(&mut self) -> &mut String {
        &mut self.lines[self.row]
    }

    pub fn insert_char(&mut self, c: char) {
        let col = self.col;
        let line = self.current_mut();
        let at = byte_idx(line, col);
        line.insert(at, c);
        self.col += 1;
    }

    /// Splits the current line at the cursor.
    pub fn insert_newline(&mut self) {
        let col = self.col;
        let line = self.current_mut();
        let at = byte_idx(line, col);
        let tail = line.split_off(at);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    /// Deletes the char before the cursor, joining lines at column 0.
    ///
    /// Returns `false` when there was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            let col = self.col;
            let line = self.current_mut();
            let at = byte_idx(line, col - 1);
            line.remove(at);
            self.col -= 1;
            true
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(self.current());
            self.current_mut().push_str(&line);
            true
        } else {
            false
        }
    }

    /// Deletes the char under the cursor, joining with the next line at end of line.
    ///
    /// Returns `false` when there was nothing to delete.
    pub fn delete(&mut self) -> bool {
        let len = char_len(self.current());
        if self.col < len {
            let col = self.col;
            let line = self.current_mut();
            let at = byte_idx(line, col);
            line.remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.current_mut().push_str(&next);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(self.current());
        }
    }

    pub fn move_right(&mut self) {
        if self.col < char_len(self.current()) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(char_len(self.current()));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(char_len(self.current()));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = char_len(self.current());
    }

    /// Converts the buffer to a document tree.
    ///
    /// One top-level block per line. `# `-prefixed lines become headings
    /// (level = number of `#`, capped at 6); everything else, including empty
    /// lines, becomes a paragraph.
    pub fn to_document(&self) -> Document {
        Document::new(self.lines.iter().map(|l| line_to_block(l)).collect())
    }
}

fn line_to_block(line: &str) -> Node {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return Node::heading(hashes as u8, rest);
        }
    }
    Node::paragraph(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckpad_core::BlockKind;

    fn typed(text: &str) -> TextBuffer {
        let mut buf = TextBuffer::default();
        for c in text.chars() {
            if c == '\n' {
                buf.insert_newline();
            } else {
                buf.insert_char(c);
            }
        }
        buf
    }

    #[test]
    fn typing_builds_lines() {
        let buf = typed("hello\nwörld");
        assert_eq!(buf.lines(), ["hello", "wörld"]);
        assert_eq!(buf.cursor(), (1, 5));
        assert_eq!(buf.text(), "hello\nwörld");
    }

    #[test]
    fn backspace_joins_lines_and_stops_at_origin() {
        let mut buf = typed("ab\nc");
        buf.move_home();
        assert!(buf.backspace());
        assert_eq!(buf.lines(), ["abc"]);
        assert_eq!(buf.cursor(), (0, 2));

        buf.move_home();
        assert!(!buf.backspace());
    }

    #[test]
    fn delete_handles_multibyte_chars() {
        let mut buf = TextBuffer::from_text("héllo");
        buf.move_right();
        assert!(buf.delete());
        assert_eq!(buf.lines(), ["hllo"]);
        buf.move_end();
        assert!(!buf.delete());
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut buf = TextBuffer::from_text("a long line\nshort");
        buf.move_end();
        buf.move_down();
        assert_eq!(buf.cursor(), (1, 5));
        buf.move_up();
        assert_eq!(buf.cursor(), (0, 5));
    }

    #[test]
    fn document_has_one_block_per_line() {
        let buf = TextBuffer::from_text("# Title\n\nBody text\n#nospace");
        let doc = buf.to_document();
        assert_eq!(doc.blocks.len(), 4);
        assert!(matches!(
            doc.blocks[0],
            duckpad_core::Node::Block { kind: BlockKind::Heading(1), .. }
        ));
        assert_eq!(doc.blocks[0].first_text(), Some("Title"));
        assert_eq!(doc.blocks[1].content_len(), 0);
        assert_eq!(doc.blocks[3].first_text(), Some("#nospace"));
        assert_eq!(doc.content_size(), 5 + 0 + 9 + 8);
    }

    #[test]
    fn loaded_tabs_become_spaces() {
        let buf = TextBuffer::from_text("\tindented");
        assert_eq!(buf.lines(), ["    indented"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let buf = TextBuffer::from_text("");
        assert!(buf.is_empty());
        assert_eq!(buf.to_document().content_size(), 0);
    }
}
