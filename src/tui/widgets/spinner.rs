//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Loading spinner shown while a fetch is in flight
pub struct Spinner<'a> {
    frame: usize,
    fragment: &'a str,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, fragment: &'a str) -> Self {
        Self { frame, fragment }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    pub fn message(&self) -> String {
        format!("{} Fetching {} ...", self.current_char(), self.fragment)
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 10 {
            return;
        }

        let text = self.message();
        let y = area.y + area.height / 2;
        let x = area.x + area.width.saturating_sub(text.chars().count() as u16) / 2;
        buf.set_string(
            x,
            y,
            &text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frames() {
        assert_eq!(SPINNER_FRAMES.len(), 10);
    }

    #[test]
    fn test_spinner_current_char() {
        assert_eq!(Spinner::new(0, "x").current_char(), '⠋');
        assert_eq!(Spinner::new(5, "x").current_char(), '⠴');
        assert_eq!(Spinner::new(10, "x").current_char(), '⠋'); // 10 % 10 = 0
    }

    #[test]
    fn test_next_frame() {
        assert_eq!(Spinner::next_frame(0), 1);
        assert_eq!(Spinner::next_frame(9), 0);
    }

    #[test]
    fn test_message_includes_fragment() {
        let spinner = Spinner::new(0, "#eu-draenor/1");
        assert_eq!(spinner.message(), "⠋ Fetching #eu-draenor/1 ...");
    }
}
