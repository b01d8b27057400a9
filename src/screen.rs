//! Frame assembly: rows, status bar and message bar into an append buffer.

use crate::append::AppendBuffer;
use crate::document::Document;
use crate::view::View;
use crossterm::{cursor, queue, style, terminal};
use std::io::{self, Write};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serialize one complete frame into `buf`.
///
/// The frame hides the cursor, homes it, redraws every text row plus the
/// two bar lines, then repositions and reveals the cursor. The caller runs
/// the scroll pass first and flushes the buffer in a single write, so the
/// terminal never sees a half-drawn state.
pub fn draw_frame(
    buf: &mut AppendBuffer,
    doc: &Document,
    view: &View,
    message: Option<&str>,
) -> io::Result<()> {
    queue!(buf, cursor::Hide, cursor::MoveTo(0, 0))?;

    draw_rows(buf, doc, view)?;
    draw_status_bar(buf, doc, view)?;
    draw_message_bar(buf, view, message)?;

    let x = view.rx().saturating_sub(view.col_offset()) as u16;
    let y = view.cursor.y.saturating_sub(view.row_offset()) as u16;
    queue!(buf, cursor::MoveTo(x, y), cursor::Show)?;
    Ok(())
}

/// Draw the text area: visible row slices, `~` markers past the end of the
/// document, and the centered welcome banner when the document is empty.
fn draw_rows(buf: &mut AppendBuffer, doc: &Document, view: &View) -> io::Result<()> {
    for y in 0..view.height() {
        let file_row = y + view.row_offset();
        if let Some(row) = doc.row(file_row) {
            let render = row.render();
            let start = view.col_offset().min(render.len());
            let len = (render.len() - start).min(view.width());
            buf.write_all(&render[start..start + len])?;
        } else if doc.row_count() == 0 && y == view.height() / 3 {
            draw_welcome(buf, view)?;
        } else {
            buf.write_all(b"~")?;
        }
        queue!(buf, terminal::Clear(terminal::ClearType::UntilNewLine))?;
        buf.write_all(b"\r\n")?;
    }
    Ok(())
}

fn draw_welcome(buf: &mut AppendBuffer, view: &View) -> io::Result<()> {
    let mut welcome = format!("dedit editor -- version {VERSION}");
    welcome.truncate(view.width());

    let mut padding = (view.width() - welcome.len()) / 2;
    if padding > 0 {
        buf.write_all(b"~")?;
        padding -= 1;
    }
    for _ in 0..padding {
        buf.write_all(b" ")?;
    }
    buf.write_all(welcome.as_bytes())
}

/// Inverted-video bar: name and line count on the left, cursor line over
/// total on the right, the gap filled with spaces to exactly the window
/// width.
fn draw_status_bar(buf: &mut AppendBuffer, doc: &Document, view: &View) -> io::Result<()> {
    queue!(buf, style::SetAttribute(style::Attribute::Reverse))?;

    let name = doc
        .filename()
        .map_or_else(|| "[No Name]".to_string(), |p| p.to_string_lossy().into_owned());
    let modified = if doc.is_dirty() { "(modified)" } else { "" };
    // Truncated as bytes; a lossy filename can put multibyte text here.
    let mut left = format!("{name:.20} - {} lines {modified}", doc.row_count()).into_bytes();
    let right = format!("{}/{}", view.cursor.y + 1, doc.row_count());

    left.truncate(view.width());
    buf.write_all(&left)?;

    let mut len = left.len();
    while len < view.width() {
        if view.width() - len == right.len() {
            buf.write_all(right.as_bytes())?;
            break;
        }
        buf.write_all(b" ")?;
        len += 1;
    }

    queue!(buf, style::SetAttribute(style::Attribute::Reset))?;
    buf.write_all(b"\r\n")
}

/// One line under the status bar; the caller passes `None` once the message
/// has aged out.
fn draw_message_bar(buf: &mut AppendBuffer, view: &View, message: Option<&str>) -> io::Result<()> {
    queue!(buf, terminal::Clear(terminal::ClearType::UntilNewLine))?;
    if let Some(text) = message {
        let end = text.len().min(view.width());
        buf.write_all(&text.as_bytes()[..end])?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::Position;

    fn doc_from(lines: &[&[u8]]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, line.to_vec());
        }
        doc
    }

    fn frame(doc: &Document, view: &View, message: Option<&str>) -> String {
        let mut buf = AppendBuffer::new();
        draw_frame(&mut buf, doc, view, message).unwrap();
        String::from_utf8_lossy(buf.as_bytes()).into_owned()
    }

    #[test]
    fn test_frame_hides_homes_then_shows_cursor() {
        let doc = Document::new();
        let view = View::new(10, 3);
        let out = frame(&doc, &view, None);
        assert!(out.starts_with("\x1b[?25l\x1b[1;1H"));
        assert!(out.ends_with("\x1b[?25h"));
    }

    #[test]
    fn test_empty_rows_draw_tildes_and_clear_to_eol() {
        let doc = Document::new();
        let view = View::new(10, 3);
        let out = frame(&doc, &view, None);
        // row 1 carries the welcome banner; rows 0 and 2 are bare tildes
        assert_eq!(out.matches("~\x1b[K\r\n").count(), 2);
    }

    #[test]
    fn test_welcome_banner_centered_on_empty_document() {
        let doc = Document::new();
        let view = View::new(40, 9);
        let out = frame(&doc, &view, None);
        let banner = format!("dedit editor -- version {VERSION}");
        let padding = (40 - banner.len()) / 2;
        let line = format!("~{}{banner}", " ".repeat(padding - 1));
        assert!(out.contains(&line));
    }

    #[test]
    fn test_welcome_banner_suppressed_when_document_has_rows() {
        let doc = doc_from(&[b"text"]);
        let view = View::new(40, 9);
        let out = frame(&doc, &view, None);
        assert!(!out.contains("dedit editor"));
    }

    #[test]
    fn test_rows_slice_by_offsets_and_width() {
        let doc = doc_from(&[b"0123456789abcdef"]);
        let mut view = View::new(4, 1);
        view.cursor = Position::new(8, 0);
        view.scroll(&doc);
        let out = frame(&doc, &view, None);
        // col_offset 5 with width 4 shows columns 5-8
        assert!(out.contains("5678\x1b[K\r\n"));
        assert!(!out.contains("9abc"));
    }

    #[test]
    fn test_row_shorter_than_offset_draws_nothing() {
        let doc = doc_from(&[b"0123456789abcdef", b"ab"]);
        let mut view = View::new(4, 2);
        view.cursor = Position::new(8, 0);
        view.scroll(&doc);
        let out = frame(&doc, &view, None);
        // second row lies entirely left of the window
        assert!(out.contains("5678\x1b[K\r\n\x1b[K\r\n"));
    }

    #[test]
    fn test_tab_renders_as_spaces() {
        let doc = doc_from(&[b"\tx"]);
        let view = View::new(20, 1);
        let out = frame(&doc, &view, None);
        assert!(out.contains("        x\x1b[K"));
    }

    #[test]
    fn test_status_bar_layout() {
        let doc = doc_from(&[b"a", b"b", b"c"]);
        let view = View::new(30, 2);
        let out = frame(&doc, &view, None);
        assert!(out.contains("\x1b[7m"));
        assert!(out.contains("[No Name] - 3 lines"));
        assert!(out.contains("1/3"));
        assert!(out.contains("\x1b[0m\r\n"));
    }

    #[test]
    fn test_status_bar_is_exactly_window_width() {
        let doc = doc_from(&[b"a"]);
        let view = View::new(30, 2);
        let out = frame(&doc, &view, None);
        let start = out.find("\x1b[7m").unwrap() + 4;
        let end = out[start..].find('\x1b').unwrap();
        assert_eq!(end, 30);
    }

    #[test]
    fn test_status_bar_shows_modified_marker() {
        let mut doc = doc_from(&[b"a"]);
        doc.insert_char(Position::new(0, 0), b'x');
        let view = View::new(40, 2);
        let out = frame(&doc, &view, None);
        assert!(out.contains("(modified)"));
    }

    #[test]
    fn test_message_bar_draws_and_truncates() {
        let doc = doc_from(&[b"a"]);
        let view = View::new(5, 1);
        let out = frame(&doc, &view, Some("hello world"));
        assert!(out.contains("hello"));
        assert!(!out.contains("hello "));
    }

    #[test]
    fn test_message_bar_empty_when_no_message() {
        let doc = doc_from(&[b"a"]);
        let view = View::new(5, 1);
        let out = frame(&doc, &view, None);
        // frame ends with the message bar clear then cursor placement
        assert!(out.ends_with("\x1b[K\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn test_cursor_positioned_relative_to_offsets() {
        let lines: Vec<Vec<u8>> = (0..30).map(|i| format!("row {i}").into_bytes()).collect();
        let refs: Vec<&[u8]> = lines.iter().map(Vec::as_slice).collect();
        let doc = doc_from(&refs);
        let mut view = View::new(10, 5);
        view.cursor = Position::new(2, 20);
        view.scroll(&doc);
        let out = frame(&doc, &view, None);
        // document row 20 is the last window row (index 4); wire format is
        // 1-indexed, so the final placement is row 5 column 3
        assert!(out.ends_with("\x1b[5;3H\x1b[?25h"));
    }
}
