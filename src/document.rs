//! Document buffer: ordered rows, edit operations, load and save.

use crate::row::Row;
use crate::Error;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A position in document coordinates: column `x` within row `y`.
///
/// `x` may equal the row's length (the end-of-line insertion point) and `y`
/// may equal the row count (the append point past the last row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Raw character column.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Position {
    /// Build a position from column and row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// The ordered sequence of rows being edited.
///
/// Row indices are contiguous `0..row_count()`. `dirty` is set by every
/// mutating operation and cleared only by a successful [`save`](Self::save)
/// or a fresh [`open`](Self::open).
///
/// Out-of-range indices passed to the edit primitives clamp or no-op
/// silently; they arise from legitimate boundary conditions such as
/// backspacing at the start of the document.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
    filename: Option<PathBuf>,
}

impl Document {
    /// Create an empty, unnamed document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from `path`.
    ///
    /// Each line is stripped of trailing `\n`/`\r` bytes. A file of N lines
    /// yields exactly N rows; an empty file yields zero rows. Open failures
    /// are fatal to the session, so they surface as [`Error::Open`].
    pub fn open(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rows = Vec::new();
        let mut pieces = bytes.split(|&b| b == b'\n').peekable();
        while let Some(piece) = pieces.next() {
            // a trailing newline produces one final empty piece, not a row
            if pieces.peek().is_none() && piece.is_empty() {
                break;
            }
            let mut line = piece;
            while let [rest @ .., b'\r' | b'\n'] = line {
                line = rest;
            }
            rows.push(Row::new(line));
        }

        Ok(Self {
            rows,
            dirty: false,
            filename: Some(path.to_path_buf()),
        })
    }

    /// All rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The row at `at`, if any.
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when unsaved modifications exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Path this document saves to, if one is set.
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Set the path used by [`save`](Self::save).
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.filename = Some(path.into());
    }

    /// Insert a new row built from `text` at index `at`.
    ///
    /// No-op when `at` is past the append point; rows at `>= at` shift down.
    pub fn insert_row(&mut self, at: usize, text: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text));
        self.dirty = true;
    }

    /// Remove the row at `at`. No-op when out of range; later rows shift up.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty = true;
    }

    /// Insert one byte at `at`, returning the advanced cursor position.
    ///
    /// Typing at the append point first materializes an empty row.
    pub fn insert_char(&mut self, at: Position, ch: u8) -> Position {
        if at.y == self.rows.len() {
            self.insert_row(self.rows.len(), Vec::new());
        }
        if let Some(row) = self.rows.get_mut(at.y) {
            row.insert_char(at.x, ch);
            self.dirty = true;
        }
        Position::new(at.x + 1, at.y)
    }

    /// Break the line at `at`, returning the cursor position on the new row.
    ///
    /// At column 0 an empty row is inserted above; otherwise the row splits
    /// at the cursor and the tail becomes the next row.
    pub fn insert_newline(&mut self, at: Position) -> Position {
        if at.x == 0 {
            self.insert_row(at.y, Vec::new());
        } else if let Some(row) = self.rows.get_mut(at.y) {
            let tail = row.split_off(at.x);
            self.insert_row(at.y + 1, tail);
        }
        Position::new(0, at.y + 1)
    }

    /// Delete the byte before `at` (backspace), returning the new position.
    ///
    /// A no-op at the start of the document and past the last row. At column
    /// 0 the current row is appended onto the previous row and removed; the
    /// cursor lands at the join point.
    pub fn delete_char(&mut self, at: Position) -> Position {
        if at.y == self.rows.len() {
            return at;
        }
        if at.x == 0 && at.y == 0 {
            return at;
        }

        if at.x > 0 {
            if let Some(row) = self.rows.get_mut(at.y) {
                row.delete_char(at.x - 1);
                self.dirty = true;
            }
            Position::new(at.x - 1, at.y)
        } else {
            let removed = self.rows.remove(at.y);
            let prev = &mut self.rows[at.y - 1];
            let join = prev.len();
            prev.append(removed.chars());
            self.dirty = true;
            Position::new(join, at.y - 1)
        }
    }

    /// Serialize every row followed by `\n`, in row order.
    ///
    /// Round-trips with [`open`](Self::open) for LF-terminated input.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    /// Write the serialized document to its path, truncating to the exact
    /// byte count first. Returns the number of bytes written.
    ///
    /// A successful save clears the dirty flag; any failure leaves it set.
    pub fn save(&mut self) -> io::Result<usize> {
        let Some(path) = self.filename.as_deref() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no file name"));
        };

        let bytes = self.serialize();
        let mut file = OpenOptions::new().write(true).create(true).open(path)?;
        file.set_len(bytes.len() as u64)?;
        file.write_all(&bytes)?;
        self.dirty = false;
        Ok(bytes.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn doc_from(lines: &[&[u8]]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, line.to_vec());
        }
        doc
    }

    #[test]
    fn test_open_strips_line_terminators() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"alpha\r\nbeta\ngamma").unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.row(0).unwrap().chars(), b"alpha");
        assert_eq!(doc.row(1).unwrap().chars(), b"beta");
        assert_eq!(doc.row(2).unwrap().chars(), b"gamma");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_open_trailing_newline_adds_no_row() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"one\ntwo\n").unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.row_count(), 2);
    }

    #[test]
    fn test_open_preserves_interior_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a\n\nb\n").unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.row_count(), 3);
        assert!(doc.row(1).unwrap().is_empty());
    }

    #[test]
    fn test_open_empty_file_yields_zero_rows() {
        let file = NamedTempFile::new().unwrap();
        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn test_open_missing_file_is_fatal() {
        let err = Document::open(Path::new("/no/such/dedit-file")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_insert_row_clamps_and_shifts() {
        let mut doc = doc_from(&[b"a", b"c"]);
        doc.insert_row(1, b"b".to_vec());
        assert_eq!(doc.row(1).unwrap().chars(), b"b");
        assert_eq!(doc.row(2).unwrap().chars(), b"c");

        // past the append point: no-op
        doc.insert_row(99, b"x".to_vec());
        assert_eq!(doc.row_count(), 3);
    }

    #[test]
    fn test_delete_row_out_of_range_is_noop() {
        let mut doc = doc_from(&[b"a"]);
        doc.delete_row(5);
        assert_eq!(doc.row_count(), 1);
        doc.delete_row(0);
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn test_insert_char_mid_row() {
        let mut doc = doc_from(&[b"abc"]);
        let pos = doc.insert_char(Position::new(1, 0), b'X');
        assert_eq!(doc.row(0).unwrap().chars(), b"aXbc");
        assert_eq!(pos, Position::new(2, 0));
    }

    #[test]
    fn test_insert_char_at_append_point_creates_row() {
        let mut doc = Document::new();
        let pos = doc.insert_char(Position::new(0, 0), b'z');
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.row(0).unwrap().chars(), b"z");
        assert_eq!(pos, Position::new(1, 0));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_insert_newline_splits_row() {
        let mut doc = doc_from(&[b"abc", b"", b"de\tf"]);
        let pos = doc.insert_newline(Position::new(2, 2));
        assert_eq!(doc.row_count(), 4);
        assert_eq!(doc.row(2).unwrap().chars(), b"de");
        assert_eq!(doc.row(3).unwrap().chars(), b"\tf");
        assert_eq!(pos, Position::new(0, 3));
    }

    #[test]
    fn test_insert_newline_at_column_zero_inserts_above() {
        let mut doc = doc_from(&[b"abc"]);
        let pos = doc.insert_newline(Position::new(0, 0));
        assert_eq!(doc.row_count(), 2);
        assert!(doc.row(0).unwrap().is_empty());
        assert_eq!(doc.row(1).unwrap().chars(), b"abc");
        assert_eq!(pos, Position::new(0, 1));
    }

    #[test]
    fn test_delete_char_boundaries() {
        let mut doc = doc_from(&[b"ab"]);

        // document start: no-op
        let pos = doc.delete_char(Position::new(0, 0));
        assert_eq!(pos, Position::new(0, 0));
        assert_eq!(doc.row(0).unwrap().chars(), b"ab");

        // past the last row: no-op
        let pos = doc.delete_char(Position::new(0, 1));
        assert_eq!(pos, Position::new(0, 1));
    }

    #[test]
    fn test_delete_char_within_row() {
        let mut doc = doc_from(&[b"abc"]);
        let pos = doc.delete_char(Position::new(2, 0));
        assert_eq!(doc.row(0).unwrap().chars(), b"ac");
        assert_eq!(pos, Position::new(1, 0));
    }

    #[test]
    fn test_delete_char_at_column_zero_joins_rows() {
        let mut doc = doc_from(&[b"ab", b"cd"]);
        let pos = doc.delete_char(Position::new(0, 1));
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.row(0).unwrap().chars(), b"abcd");
        assert_eq!(pos, Position::new(2, 0));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        let content = b"first\nsecond\nwith\ttab\n";
        file.write_all(content).unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.serialize(), content);
    }

    #[test]
    fn test_save_reports_bytes_and_clears_dirty() {
        let file = NamedTempFile::new().unwrap();
        let mut doc = doc_from(&[b"hello", b"world"]);
        doc.set_filename(file.path());
        assert!(doc.is_dirty());

        let written = doc.save().unwrap();
        assert_eq!(written, 12);
        assert!(!doc.is_dirty());
        assert_eq!(fs::read(file.path()).unwrap(), b"hello\nworld\n");
    }

    #[test]
    fn test_save_truncates_longer_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a much longer pre-existing file body\n")
            .unwrap();

        let mut doc = doc_from(&[b"tiny"]);
        doc.set_filename(file.path());
        doc.save().unwrap();
        assert_eq!(fs::read(file.path()).unwrap(), b"tiny\n");
    }

    #[test]
    fn test_save_without_filename_fails_and_stays_dirty() {
        let mut doc = doc_from(&[b"x"]);
        assert!(doc.save().is_err());
        assert!(doc.is_dirty());
    }
}
