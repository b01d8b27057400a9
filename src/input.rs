//! Raw input decoding: bytes in, logical key events out.

use std::io;

/// Escape byte that introduces multi-byte sequences.
const ESC: u8 = 0x1b;

/// The backspace byte as sent by most terminals.
pub const BACKSPACE: u8 = 127;

/// Map a letter to the byte its Ctrl-chord produces.
#[must_use]
pub const fn ctrl(byte: u8) -> u8 {
    byte & 0x1f
}

/// One logical keypress.
///
/// Plain bytes pass through as [`Key::Char`], control bytes included; the
/// named variants cover keys that arrive as escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal input byte, including control chords like Ctrl-Q.
    Char(u8),
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Jump to the start of the line.
    Home,
    /// Jump to the end of the line.
    End,
    /// Scroll up one page.
    PageUp,
    /// Scroll down one page.
    PageDown,
    /// Delete the character under the cursor.
    Delete,
    /// A bare escape, or any unrecognized escape sequence.
    Escape,
}

/// A source of raw input bytes with a short inactivity timeout.
///
/// `read_byte` blocks for at most one read tick (tenths of a second at the
/// OS level) and returns `Ok(None)` when no byte arrived. The same timeout
/// serves both keypress polling and escape-sequence disambiguation, so no
/// separate timer is needed.
pub trait ByteSource {
    /// Read one byte, or `None` on timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Decode the next logical key from `source`.
///
/// Returns `Ok(None)` when the read tick elapses with no input. Otherwise
/// resolves exactly one [`Key`] per call from a 1-3 byte lookahead:
///
/// - any byte other than escape is itself the key;
/// - `ESC [ 1~/7~`, `3~`, `4~/8~`, `5~`, `6~` map to Home, Delete, End,
///   PageUp and PageDown;
/// - `ESC [ A/B/C/D/H/F` map to the arrows, Home and End;
/// - `ESC 0 H/F` (an alternate prefix some terminals emit) map to Home/End;
/// - anything else, including an escape followed by silence, resolves to
///   [`Key::Escape`].
///
/// Consumed bytes are never pushed back; a malformed sequence costs its
/// bytes and degenerates to a harmless escape.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Option<Key>> {
    let Some(first) = source.read_byte()? else {
        return Ok(None);
    };
    if first != ESC {
        return Ok(Some(Key::Char(first)));
    }

    // Escape sequences deliver their follow bytes within one read tick; a
    // timeout on either read means the user pressed the escape key itself.
    let Some(b0) = source.read_byte()? else {
        return Ok(Some(Key::Escape));
    };
    let Some(b1) = source.read_byte()? else {
        return Ok(Some(Key::Escape));
    };

    let key = if b0 == b'[' {
        if b1.is_ascii_digit() {
            let Some(b2) = source.read_byte()? else {
                return Ok(Some(Key::Escape));
            };
            if b2 == b'~' {
                match b1 {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                }
            } else {
                Key::Escape
            }
        } else {
            match b1 {
                b'A' => Key::Up,
                b'B' => Key::Down,
                b'C' => Key::Right,
                b'D' => Key::Left,
                b'H' => Key::Home,
                b'F' => Key::End,
                _ => Key::Escape,
            }
        }
    } else if b0 == b'0' {
        match b1 {
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Escape,
        }
    } else {
        Key::Escape
    };

    Ok(Some(key))
}
