//! A single line of text with its tab-expanded rendered form.

/// Tab stop width used when expanding tabs for display.
pub const TAB_STOP: usize = 8;

/// One row of the document.
///
/// `chars` holds the raw text bytes with no trailing newline. `render` is
/// the derived display form: every tab expanded with spaces to the next
/// multiple of [`TAB_STOP`], everything else copied through. `render` is
/// rebuilt on every mutation of `chars` and never edited independently, so
/// `render.len() >= chars.len()` always holds, with equality exactly when
/// the row contains no tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Create a row from raw text bytes.
    #[must_use]
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            chars: text.into(),
            render: Vec::new(),
        };
        row.rebuild_render();
        row
    }

    /// Raw text bytes.
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Display bytes with tabs expanded.
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the raw text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True if the row holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Length of the rendered form in columns.
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Insert one byte at raw column `at`, clamped to the row length.
    ///
    /// Out-of-range positions append rather than fail; the clamp is a
    /// boundary condition, not an error.
    pub fn insert_char(&mut self, at: usize, ch: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
        self.rebuild_render();
    }

    /// Remove the byte at raw column `at`. No-op when out of range.
    pub fn delete_char(&mut self, at: usize) {
        if at >= self.chars.len() {
            return;
        }
        self.chars.remove(at);
        self.rebuild_render();
    }

    /// Concatenate `text` onto the end of the row.
    pub fn append(&mut self, text: &[u8]) {
        self.chars.extend_from_slice(text);
        self.rebuild_render();
    }

    /// Truncate the row at `at` and return the tail.
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.rebuild_render();
        tail
    }

    /// Map a raw column to its rendered column.
    ///
    /// Walks the text left to right: a tab advances the rendered column to
    /// the next multiple of [`TAB_STOP`], any other byte advances it by one.
    /// Pure function of `chars`; `cx_to_rx(len()) == render_len()`.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &byte in self.chars.iter().take(cx) {
            if byte == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    fn rebuild_render(&mut self) {
        self.render.clear();
        for &byte in &self.chars {
            if byte == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(byte);
            }
        }
    }
}
