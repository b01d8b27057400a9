//! Append-only output buffer for building one frame per write.

use std::io::{self, Write};

/// Accumulates terminal-control and text bytes for a single atomic write.
///
/// A frame is built by queueing crossterm commands and raw bytes into the
/// buffer (it implements [`io::Write`]), then handing the whole thing to the
/// terminal at once. Batching into one `write(2)` avoids visible tearing
/// between the clear and redraw of each line.
///
/// Buffers are scoped to one redraw: created fresh, filled, flushed, dropped.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    bytes: Vec<u8>,
}

impl AppendBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a buffer with preallocated capacity.
    ///
    /// Callers that know the approximate frame size (roughly width x height)
    /// can avoid regrowth during the draw pass.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Accumulated bytes so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes accumulated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Write for AppendBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
