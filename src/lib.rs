//! dedit: a minimal full-screen terminal text editor.
//!
//! The editor puts the terminal into raw mode, renders a document in a
//! scrollable viewport, and applies edits with per-keystroke feedback. One
//! blocking read loop drives everything: bytes are decoded into logical keys,
//! keys mutate the document or the cursor, and each pass serializes a whole
//! frame into an append buffer that is flushed to the terminal in a single
//! write.
//!
//! # Architecture
//!
//! - [`append::AppendBuffer`] accumulates one frame of output bytes.
//! - [`input`] decodes raw bytes (including escape sequences) into [`Key`]s.
//! - [`row::Row`] and [`document::Document`] hold the text with tab-aware
//!   rendered forms.
//! - [`view::View`] tracks the cursor and viewport offsets.
//! - [`screen`] assembles frames from the document and view.
//! - [`terminal`] owns raw mode, window sizing, and restore discipline.
//! - [`editor::Editor`] orchestrates the read-decode-mutate-render loop.
//!
//! The [`terminal::Terminal`] trait is the only seam to the operating
//! system; everything above it runs against scripted byte sources in tests.

pub mod append;
pub mod document;
pub mod editor;
pub mod input;
pub mod row;
pub mod screen;
pub mod terminal;
pub mod view;

pub use append::AppendBuffer;
pub use document::{Document, Position};
pub use editor::Editor;
pub use input::{ByteSource, Key};
pub use row::Row;
pub use terminal::{RawTerminal, Terminal};
pub use view::View;

use std::io;
use std::path::PathBuf;

/// Editor error type.
///
/// Only unrecoverable failures surface here. Save errors and cancelled
/// prompts stay inside the session loop as status-bar messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Terminal attributes could not be queried or applied.
    #[error("terminal setup failed")]
    TerminalSetup(#[source] io::Error),
    /// The window size could not be determined.
    #[error("could not determine window size")]
    WindowSize,
    /// A file could not be opened for reading.
    #[error("could not open {}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// IO error during terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
