//! Raw terminal mode, window sizing, and restore discipline.

use crate::input::ByteSource;
use crate::Error;
use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Terminal attributes saved before entering raw mode, for restoration from
/// panic hooks and signal-adjacent paths that cannot reach the live
/// [`RawTerminal`].
static ORIGINAL_TERMIOS: OnceLock<libc::termios> = OnceLock::new();

/// Set when the window size changed since the last poll.
static WINDOW_CHANGED: AtomicBool = AtomicBool::new(false);

/// Backend trait for the session loop.
///
/// The real implementation is [`RawTerminal`]; tests drive the editor with
/// scripted implementations instead of a live terminal.
pub trait Terminal: ByteSource {
    /// Current window size as (columns, rows).
    fn size(&mut self) -> Result<(u16, u16), Error>;

    /// Write one complete frame to the display.
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// True once after the window size changed.
    fn take_resize(&mut self) -> bool {
        false
    }
}

/// The controlling terminal in raw mode.
///
/// Construction switches the terminal to raw input with a 100 ms read tick
/// (`VMIN = 0`, `VTIME = 1`); that tick doubles as the escape-sequence
/// timeout for the key decoder. Dropping the value clears the screen and
/// restores the saved attributes, so every exit path through the stack
/// leaves the terminal usable.
pub struct RawTerminal {
    original: libc::termios,
}

impl std::fmt::Debug for RawTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // libc::termios carries no Debug impl
        f.debug_struct("RawTerminal").finish_non_exhaustive()
    }
}

impl RawTerminal {
    /// Enter raw mode on the process's controlling terminal.
    pub fn new() -> Result<Self, Error> {
        // SAFETY: tcgetattr fills the termios struct for a valid fd; a
        // zeroed termios is a valid value of the (all-integer) struct.
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut original) };
        if rc != 0 {
            return Err(Error::TerminalSetup(io::Error::last_os_error()));
        }
        let _ = ORIGINAL_TERMIOS.set(original);

        let mut raw = original;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // read returns after one byte or a tenth of a second, whichever
        // comes first
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;

        // SAFETY: applies a fully initialized termios to a valid fd.
        let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) };
        if rc != 0 {
            return Err(Error::TerminalSetup(io::Error::last_os_error()));
        }

        install_resize_handler();
        Ok(Self { original })
    }

    /// Window size by cursor probe: park the cursor at the far corner and
    /// ask the terminal where it ended up. Fallback for terminals where
    /// `TIOCGWINSZ` reports nothing useful.
    fn size_from_cursor_probe(&mut self) -> Result<(u16, u16), Error> {
        write_bytes(b"\x1b[999C\x1b[999B\x1b[6n").map_err(Error::TerminalSetup)?;

        // expected response: ESC [ rows ; cols R
        let mut response = Vec::with_capacity(32);
        while response.len() < 31 {
            match self.read_byte().map_err(Error::TerminalSetup)? {
                Some(b'R') | None => break,
                Some(byte) => response.push(byte),
            }
        }

        let rest = response.strip_prefix(b"\x1b[").ok_or(Error::WindowSize)?;
        let text = std::str::from_utf8(rest).map_err(|_| Error::WindowSize)?;
        let (rows, cols) = text.split_once(';').ok_or(Error::WindowSize)?;
        let rows: u16 = rows.parse().map_err(|_| Error::WindowSize)?;
        let cols: u16 = cols.parse().map_err(|_| Error::WindowSize)?;
        Ok((cols, rows))
    }
}

impl ByteSource for RawTerminal {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        // SAFETY: reads at most one byte into a valid, writable buffer.
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                std::ptr::addr_of_mut!(byte).cast(),
                1,
            )
        };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // EINTR arrives when SIGWINCH lands mid-read; both count as
                // an empty tick, not a failure
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

impl Terminal for RawTerminal {
    fn size(&mut self) -> Result<(u16, u16), Error> {
        // SAFETY: TIOCGWINSZ fills a winsize struct for a valid fd; zeroed
        // winsize is a valid initial value.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if rc == -1 || ws.ws_col == 0 {
            return self.size_from_cursor_probe();
        }
        Ok((ws.ws_col, ws.ws_row))
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        write_bytes(frame)
    }

    fn take_resize(&mut self) -> bool {
        window_size_changed()
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        // Clear the screen and rehome before giving the terminal back, so
        // neither a clean quit nor an error leaves editor content behind.
        let mut seq = Vec::new();
        let _ = queue!(seq, Clear(ClearType::All), cursor::MoveTo(0, 0), cursor::Show);
        let _ = write_bytes(&seq);

        // SAFETY: restores the attributes saved in `new` to a valid fd.
        let _ = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.original) };
    }
}

/// Write all of `bytes` to the terminal fd, retrying on interruption.
fn write_bytes(bytes: &[u8]) -> io::Result<()> {
    let mut remaining = bytes;
    while !remaining.is_empty() {
        // SAFETY: writes from a valid buffer of exactly the given length.
        let n = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                remaining.as_ptr().cast(),
                remaining.len(),
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        remaining = &remaining[n as usize..];
    }
    Ok(())
}

/// Consume the pending window-change flag.
fn window_size_changed() -> bool {
    WINDOW_CHANGED.swap(false, Ordering::SeqCst)
}

/// Signal handler that records a window-size change.
///
/// Runs in signal context, so it only performs an atomic store; the event
/// loop polls the flag on its next read tick.
extern "C" fn handle_window_change(_signum: libc::c_int) {
    WINDOW_CHANGED.store(true, Ordering::SeqCst);
}

fn install_resize_handler() {
    // SAFETY: libc::signal is safe to call with a valid signal number and a
    // handler of the required `extern "C" fn(c_int)` signature. The handler
    // only performs an async-signal-safe atomic write.
    let result = unsafe {
        libc::signal(
            libc::SIGWINCH,
            handle_window_change as libc::sighandler_t,
        )
    };
    if result == libc::SIG_ERR {
        #[cfg(debug_assertions)]
        eprintln!("Warning: failed to install SIGWINCH handler");
    }
}

/// Emergency terminal restore function.
/// Call this in panic hooks to ensure the terminal is usable after a crash.
pub fn emergency_restore() {
    if let Some(original) = ORIGINAL_TERMIOS.get() {
        // SAFETY: restores previously saved attributes to a valid fd.
        let _ = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) };
    }

    // Best-effort screen cleanup - ignore errors
    let mut seq = Vec::new();
    let _ = queue!(seq, Clear(ClearType::All), cursor::MoveTo(0, 0), cursor::Show);
    let _ = write_bytes(&seq);
}

/// Install a panic hook that restores terminal state before printing panic
/// info. This should be called once at application startup.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Restore terminal BEFORE printing panic message
        emergency_restore();
        original_hook(info);
    }));
}
