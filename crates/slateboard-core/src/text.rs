//! In-progress text entry with a blinking caret.
//!
//! A [`TextEditor`] exists only between the placement click and the
//! commit/cancel keystroke. Committing hands the buffer to the raster
//! pipeline; the editor itself never touches the committed surface.

use crate::input::KeyEvent;
use kurbo::Point;
use slateboard_raster::TextStyle;

/// Seconds between caret visibility flips.
pub const BLINK_INTERVAL: f64 = 0.5;

/// Outcome of routing a key event to an active text editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKeyResult {
    /// The buffer changed; the preview needs repainting.
    Edited,
    /// Enter: paint the buffer and end the session.
    Commit,
    /// Escape: discard the buffer and end the session.
    Cancel,
    /// The key means nothing to the editor.
    Ignored,
}

/// Caret position, pending buffer and blink state for one text session.
#[derive(Debug, Clone)]
pub struct TextEditor {
    caret: Point,
    buffer: String,
    style: TextStyle,
    blink_elapsed: f64,
    caret_visible: bool,
}

impl TextEditor {
    /// Start a session at the given logical caret position. The caret
    /// starts visible.
    pub fn new(caret: Point, style: TextStyle) -> Self {
        Self {
            caret,
            buffer: String::new(),
            style,
            blink_elapsed: 0.0,
            caret_visible: true,
        }
    }

    pub fn caret(&self) -> Point {
        self.caret
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the caret is in the visible phase of its blink cycle.
    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Advance the blink clock by `dt` seconds. Returns true when the
    /// caret visibility flipped and the preview needs repainting.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.blink_elapsed += dt;
        let mut flipped = false;
        while self.blink_elapsed >= BLINK_INTERVAL {
            self.blink_elapsed -= BLINK_INTERVAL;
            self.caret_visible = !self.caret_visible;
            flipped = !flipped;
        }
        flipped
    }

    /// Route a key event to the editor.
    pub fn handle_key(&mut self, event: &KeyEvent) -> TextKeyResult {
        match event.key.as_str() {
            "Enter" => TextKeyResult::Commit,
            "Escape" => TextKeyResult::Cancel,
            "Backspace" => {
                self.buffer.pop();
                TextKeyResult::Edited
            }
            _ if event.is_printable() => {
                self.buffer.push_str(&event.key);
                TextKeyResult::Edited
            }
            _ => TextKeyResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn editor() -> TextEditor {
        TextEditor::new(Point::new(10.0, 20.0), TextStyle::default())
    }

    #[test]
    fn test_typing_appends_and_backspace_pops() {
        let mut ed = editor();
        assert_eq!(ed.handle_key(&KeyEvent::bare("h")), TextKeyResult::Edited);
        assert_eq!(ed.handle_key(&KeyEvent::bare("i")), TextKeyResult::Edited);
        assert_eq!(ed.buffer(), "hi");

        assert_eq!(
            ed.handle_key(&KeyEvent::bare("Backspace")),
            TextKeyResult::Edited
        );
        assert_eq!(ed.buffer(), "h");
    }

    #[test]
    fn test_backspace_on_empty_buffer() {
        let mut ed = editor();
        assert_eq!(
            ed.handle_key(&KeyEvent::bare("Backspace")),
            TextKeyResult::Edited
        );
        assert_eq!(ed.buffer(), "");
    }

    #[test]
    fn test_enter_commits_escape_cancels() {
        let mut ed = editor();
        assert_eq!(ed.handle_key(&KeyEvent::bare("Enter")), TextKeyResult::Commit);
        assert_eq!(
            ed.handle_key(&KeyEvent::bare("Escape")),
            TextKeyResult::Cancel
        );
    }

    #[test]
    fn test_nonprintable_keys_ignored() {
        let mut ed = editor();
        assert_eq!(
            ed.handle_key(&KeyEvent::bare("ArrowLeft")),
            TextKeyResult::Ignored
        );
        assert_eq!(
            ed.handle_key(&KeyEvent::new("a", Modifiers { ctrl: true, ..Modifiers::default() })),
            TextKeyResult::Ignored
        );
        assert_eq!(ed.buffer(), "");
    }

    #[test]
    fn test_blink_flips_every_interval() {
        let mut ed = editor();
        assert!(ed.caret_visible());

        assert!(!ed.tick(BLINK_INTERVAL / 2.0));
        assert!(ed.caret_visible());

        assert!(ed.tick(BLINK_INTERVAL / 2.0));
        assert!(!ed.caret_visible());

        assert!(ed.tick(BLINK_INTERVAL));
        assert!(ed.caret_visible());
    }

    #[test]
    fn test_double_interval_tick_nets_out() {
        let mut ed = editor();
        // Two flips in one tick leave visibility unchanged.
        assert!(!ed.tick(BLINK_INTERVAL * 2.0));
        assert!(ed.caret_visible());
    }
}
