//! Soft wrapping with cursor mapping.
//!
//! ratatui's `Wrap` does not report where it broke a line, so the editor and
//! prompt panels wrap text themselves and render one `Line` per visual row.
//! Rows are char ranges into the source line; columns assume one cell per
//! char.

use std::ops::Range;

/// Splits `line` into rows of at most `width` chars, breaking after a space
/// when one is available and mid-word otherwise.
///
/// Rows cover the line contiguously; an empty line is one empty row.
pub fn wrap_ranges(line: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let chars: Vec<char> = line.chars().collect();
    let mut rows = Vec::new();
    let mut start = 0;

    while chars.len() - start > width {
        let limit = start + width;
        let end = chars[start..limit]
            .iter()
            .rposition(|&c| c == ' ')
            .map_or(limit, |i| start + i + 1);
        rows.push(start..end);
        start = end;
    }
    rows.push(start..chars.len());
    rows
}

/// Visual (row, column) of char column `col` within wrapped `rows`.
///
/// A cursor after the last char of a full final row moves to the start of a
/// new row, so it never sits past the right edge.
pub fn cursor_in_rows(rows: &[Range<usize>], col: usize, width: usize) -> (usize, usize) {
    let row = rows.iter().rposition(|r| r.start <= col).unwrap_or(0);
    let x = col - rows[row].start.min(col);
    if x >= width.max(1) {
        (row + 1, 0)
    } else {
        (row, x)
    }
}

/// The chars of `line` in `range`.
pub fn slice_chars(line: &str, range: Range<usize>) -> String {
    line.chars().skip(range.start).take(range.len()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_is_one_row() {
        assert_eq!(wrap_ranges("hello", 10), vec![0..5]);
        assert_eq!(wrap_ranges("", 10), vec![0..0]);
    }

    #[test]
    fn breaks_after_last_space_that_fits() {
        let rows = wrap_ranges("aaa bbb ccc", 8);
        assert_eq!(rows, vec![0..8, 8..11]);
        assert_eq!(slice_chars("aaa bbb ccc", rows[0].clone()), "aaa bbb ");
    }

    #[test]
    fn long_word_is_split() {
        assert_eq!(wrap_ranges("abcdefghij", 4), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(wrap_ranges("ééééé", 2), vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn cursor_maps_through_rows() {
        let rows = wrap_ranges("aaa bbb ccc", 8);
        assert_eq!(cursor_in_rows(&rows, 0, 8), (0, 0));
        assert_eq!(cursor_in_rows(&rows, 8, 8), (1, 0));
        assert_eq!(cursor_in_rows(&rows, 11, 8), (1, 3));
    }

    #[test]
    fn cursor_after_full_row_starts_new_row() {
        let rows = wrap_ranges("abcd", 4);
        assert_eq!(cursor_in_rows(&rows, 4, 4), (1, 0));
    }
}
