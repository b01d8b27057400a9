//! Cursor tracking and viewport scrolling.

use crate::document::{Document, Position};
use crate::row::Row;

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

/// The visible window over the document plus the cursor inside it.
///
/// `cursor` is in document coordinates. `rx` is the rendered column derived
/// from the cursor during [`scroll`](Self::scroll); it is recomputed every
/// pass rather than maintained incrementally. `width`/`height` describe the
/// text area only; the status and message bars live below it.
#[derive(Debug)]
pub struct View {
    /// Cursor position in document coordinates.
    pub cursor: Position,
    rx: usize,
    row_offset: usize,
    col_offset: usize,
    width: usize,
    height: usize,
}

impl View {
    /// Create a view over a `width` x `height` text area.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cursor: Position::default(),
            rx: 0,
            row_offset: 0,
            col_offset: 0,
            width,
            height,
        }
    }

    /// Adopt a new text-area size after a window change.
    ///
    /// Offsets are left as-is; the next [`scroll`](Self::scroll) pass clamps
    /// them back around the cursor.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Rendered cursor column as of the last scroll pass.
    #[must_use]
    pub fn rx(&self) -> usize {
        self.rx
    }

    /// First visible document row.
    #[must_use]
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible rendered column.
    #[must_use]
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Text area width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Text area height in rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Recompute `rx` and clamp the offsets so the cursor is visible.
    ///
    /// Clamping is directional: moving above or left of the window snaps
    /// the offset to the cursor; moving below or right snaps it so the
    /// cursor sits on the last visible row or column. Runs before every
    /// redraw and is idempotent when the cursor has not moved.
    pub fn scroll(&mut self, doc: &Document) {
        self.rx = doc
            .row(self.cursor.y)
            .map_or(0, |row| row.cx_to_rx(self.cursor.x));

        if self.cursor.y < self.row_offset {
            self.row_offset = self.cursor.y;
        }
        if self.cursor.y >= self.row_offset + self.height {
            self.row_offset = self.cursor.y - self.height + 1;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + self.width {
            self.col_offset = self.rx - self.width + 1;
        }
    }

    /// Move the cursor one step, with line-wrap at row edges.
    ///
    /// Left at column 0 lands at the end of the previous row; Right at the
    /// end of a row lands at column 0 of the next. Vertical moves clamp the
    /// row to `[0, row_count]`, then the column snaps to the new row's
    /// length when it would overshoot.
    pub fn move_cursor(&mut self, direction: Direction, doc: &Document) {
        match direction {
            Direction::Left => {
                if self.cursor.x != 0 {
                    self.cursor.x -= 1;
                } else if self.cursor.y > 0 {
                    self.cursor.y -= 1;
                    self.cursor.x = doc.row(self.cursor.y).map_or(0, Row::len);
                }
            }
            Direction::Right => {
                if let Some(row) = doc.row(self.cursor.y) {
                    if self.cursor.x < row.len() {
                        self.cursor.x += 1;
                    } else if self.cursor.x == row.len() {
                        self.cursor.y += 1;
                        self.cursor.x = 0;
                    }
                }
            }
            Direction::Up => {
                if self.cursor.y != 0 {
                    self.cursor.y -= 1;
                }
            }
            Direction::Down => {
                if self.cursor.y < doc.row_count() {
                    self.cursor.y += 1;
                }
            }
        }

        let row_len = doc.row(self.cursor.y).map_or(0, Row::len);
        if self.cursor.x > row_len {
            self.cursor.x = row_len;
        }
    }

    /// Jump to column 0.
    pub fn move_to_line_start(&mut self) {
        self.cursor.x = 0;
    }

    /// Jump past the last character of the current row.
    pub fn move_to_line_end(&mut self, doc: &Document) {
        if let Some(row) = doc.row(self.cursor.y) {
            self.cursor.x = row.len();
        }
    }

    /// Move one page up: cursor to the top of the window, then a full page
    /// of Up moves so the usual per-line clamping applies.
    pub fn page_up(&mut self, doc: &Document) {
        self.cursor.y = self.row_offset;
        for _ in 0..self.height {
            self.move_cursor(Direction::Up, doc);
        }
    }

    /// Move one page down: cursor to the bottom of the window (clamped to
    /// the append point), then a full page of Down moves.
    pub fn page_down(&mut self, doc: &Document) {
        self.cursor.y = (self.row_offset + self.height).saturating_sub(1);
        if self.cursor.y > doc.row_count() {
            self.cursor.y = doc.row_count();
        }
        for _ in 0..self.height {
            self.move_cursor(Direction::Down, doc);
        }
    }
}
