//! The session loop: key dispatch, prompts, save, and quit confirmation.

use crate::document::{Document, Position};
use crate::input::{self, read_key, Key, BACKSPACE};
use crate::screen;
use crate::terminal::Terminal;
use crate::view::{Direction, View};
use crate::{AppendBuffer, Error};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Ctrl-Q presses required to discard unsaved changes.
const QUIT_CONFIRMATIONS: u8 = 3;

/// How long a status message stays eligible for display.
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rows at the bottom of the window reserved for the status and message
/// bars.
const BAR_ROWS: usize = 2;

const CTRL_Q: u8 = input::ctrl(b'q');
const CTRL_S: u8 = input::ctrl(b's');
const CTRL_H: u8 = input::ctrl(b'h');
const CTRL_L: u8 = input::ctrl(b'l');

/// A transient message for the bottom line of the screen.
#[derive(Debug)]
struct StatusMessage {
    text: String,
    time: Instant,
}

impl StatusMessage {
    fn new() -> Self {
        Self {
            text: String::new(),
            time: Instant::now(),
        }
    }

    fn set(&mut self, text: String) {
        self.text = text;
        self.time = Instant::now();
    }

    /// The message, if one is set and younger than [`MESSAGE_TIMEOUT`].
    fn display(&self) -> Option<&str> {
        if self.text.is_empty() || self.time.elapsed() >= MESSAGE_TIMEOUT {
            None
        } else {
            Some(&self.text)
        }
    }
}

/// One editing session over a single document.
///
/// Owns the document and the view; borrows a [`Terminal`] only while
/// running, so tests can drive a session against a scripted backend.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    view: View,
    status: StatusMessage,
    quit_presses_left: u8,
    should_quit: bool,
}

impl Editor {
    /// Create a session for `document` in a window of `width` x `height`
    /// cells. Two rows are reserved for the bars; the rest is text area.
    #[must_use]
    pub fn new(document: Document, width: u16, height: u16) -> Self {
        let text_rows = (usize::from(height)).saturating_sub(BAR_ROWS);
        Self {
            document,
            view: View::new(usize::from(width), text_rows),
            status: StatusMessage::new(),
            quit_presses_left: QUIT_CONFIRMATIONS,
            should_quit: false,
        }
    }

    /// The document being edited.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The viewport over the document.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The currently displayable status message, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.display()
    }

    /// Set the status message shown on the bottom line.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status.set(text.into());
    }

    /// Run the session until the user quits.
    ///
    /// Each iteration draws one frame, then blocks until a key arrives.
    /// Empty read ticks are used to poll for window-size changes.
    pub fn run<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<(), Error> {
        debug!(
            rows = self.document.row_count(),
            "entering session loop"
        );
        while !self.should_quit {
            self.refresh_screen(terminal)?;
            let key = self.wait_for_key(terminal)?;
            self.process_key(terminal, key)?;
        }
        debug!("session loop finished");
        Ok(())
    }

    /// Draw a full frame and hand it to the terminal as a single write.
    fn refresh_screen<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<(), Error> {
        self.view.scroll(&self.document);
        let mut frame =
            AppendBuffer::with_capacity((self.view.width() + 8) * (self.view.height() + BAR_ROWS));
        screen::draw_frame(&mut frame, &self.document, &self.view, self.status.display())?;
        terminal.write_frame(frame.as_bytes())?;
        Ok(())
    }

    /// Block until a key arrives, servicing resize events on empty ticks.
    fn wait_for_key<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<Key, Error> {
        loop {
            if let Some(key) = read_key(terminal)? {
                return Ok(key);
            }
            if terminal.take_resize() {
                self.handle_resize(terminal)?;
                self.refresh_screen(terminal)?;
            }
        }
    }

    /// Re-query the window size and resize the viewport to match.
    fn handle_resize<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<(), Error> {
        let (width, height) = terminal.size()?;
        let text_rows = (usize::from(height)).saturating_sub(BAR_ROWS);
        self.view.resize(usize::from(width), text_rows);
        debug!(width, height, "window resized");
        Ok(())
    }

    fn process_key<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        key: Key,
    ) -> Result<(), Error> {
        trace!(?key, "dispatch");
        match key {
            Key::Char(b'\r') => {
                self.view.cursor = self.document.insert_newline(self.view.cursor);
            }
            Key::Char(CTRL_Q) => {
                if self.document.is_dirty() {
                    self.quit_presses_left = self.quit_presses_left.saturating_sub(1);
                    if self.quit_presses_left > 0 {
                        let plural = if self.quit_presses_left == 1 { "" } else { "s" };
                        self.status.set(format!(
                            "WARNING! File has unsaved changes. \
                             Press Ctrl-Q {} more time{} to quit.",
                            self.quit_presses_left, plural
                        ));
                        return Ok(());
                    }
                }
                debug!("quit requested");
                self.should_quit = true;
                return Ok(());
            }
            Key::Char(CTRL_S) => self.save(terminal)?,
            Key::Home => self.view.move_to_line_start(),
            Key::End => self.view.move_to_line_end(&self.document),
            Key::Char(BACKSPACE | CTRL_H) | Key::Delete => {
                if key == Key::Delete {
                    self.view.move_cursor(Direction::Right, &self.document);
                }
                self.view.cursor = self.document.delete_char(self.view.cursor);
            }
            Key::PageUp => self.view.page_up(&self.document),
            Key::PageDown => self.view.page_down(&self.document),
            Key::Up => self.view.move_cursor(Direction::Up, &self.document),
            Key::Down => self.view.move_cursor(Direction::Down, &self.document),
            Key::Left => self.view.move_cursor(Direction::Left, &self.document),
            Key::Right => self.view.move_cursor(Direction::Right, &self.document),
            // Ctrl-L asks for a redraw, which the loop does anyway; a lone
            // escape is a key sequence that went nowhere
            Key::Char(CTRL_L) | Key::Escape => {}
            Key::Char(byte) => {
                self.view.cursor = self.document.insert_char(self.view.cursor, byte);
            }
        }
        // Any key other than Ctrl-Q rearms the quit confirmation.
        self.quit_presses_left = QUIT_CONFIRMATIONS;
        Ok(())
    }

    /// Save the document, prompting for a file name if it has none.
    fn save<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<(), Error> {
        if self.document.filename().is_none() {
            match self.prompt(terminal, "Save as: ")? {
                Some(name) => self.document.set_filename(name),
                None => {
                    self.status.set("Save aborted.".to_string());
                    return Ok(());
                }
            }
        }
        let name = self
            .document
            .filename()
            .map_or_else(String::new, |path| path.to_string_lossy().into_owned());
        match self.document.save() {
            Ok(bytes) => {
                debug!(bytes, name = %name, "document saved");
                self.status
                    .set(format!("Saved {bytes} bytes to {name} successfully."));
            }
            Err(err) => {
                debug!(name = %name, error = %err, "save failed");
                self.status
                    .set(format!("Could not save file! I/O error: {err}"));
            }
        }
        Ok(())
    }

    /// Line-edit a value on the message bar. Returns `None` if the user
    /// aborted with escape.
    fn prompt<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        prompt: &str,
    ) -> Result<Option<String>, Error> {
        let mut input = String::new();
        loop {
            self.status.set(format!("{prompt}{input}"));
            self.refresh_screen(terminal)?;
            match self.wait_for_key(terminal)? {
                Key::Char(BACKSPACE | CTRL_H) | Key::Delete => {
                    input.pop();
                }
                Key::Escape => {
                    self.status.set(String::new());
                    return Ok(None);
                }
                Key::Char(b'\r') => {
                    if !input.is_empty() {
                        self.status.set(String::new());
                        return Ok(Some(input));
                    }
                }
                Key::Char(byte) if byte.is_ascii() && !byte.is_ascii_control() => {
                    input.push(char::from(byte));
                }
                _ => {}
            }
        }
    }
}
