//! Token tab bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Longest tab label before truncation
const MAX_LABEL_CHARS: usize = 24;

/// Shorten a label to `MAX_LABEL_CHARS` (UTF-8 safe)
pub fn tab_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        format!("{}…", name.chars().take(MAX_LABEL_CHARS - 1).collect::<String>())
    } else {
        name.to_string()
    }
}

/// Tab bar listing one tab per fetched token
pub struct TokenTabs<'a> {
    names: Vec<&'a str>,
    selected: Option<usize>,
    theme: Theme,
}

impl<'a> TokenTabs<'a> {
    pub fn new(names: Vec<&'a str>, selected: Option<usize>, theme: Theme) -> Self {
        Self {
            names,
            selected,
            theme,
        }
    }
}

impl Widget for TokenTabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.names.is_empty() {
            let hint = "No tokens yet. Press / to search.";
            let x = area.x + area.width.saturating_sub(hint.chars().count() as u16) / 2;
            buf.set_string(x, area.y, hint, Style::default().fg(self.theme.muted()));
            return;
        }

        let mut x = area.x + 1;
        for (i, name) in self.names.iter().enumerate() {
            let is_selected = Some(i) == self.selected;
            let label = tab_label(name);
            let display = if is_selected {
                format!("[{}]", label)
            } else {
                label
            };

            let display_len = display.chars().count() as u16;
            if x + display_len > area.x + area.width {
                // Signal there are more tabs than fit
                if x < area.x + area.width {
                    buf.set_string(x, area.y, "…", Style::default().fg(self.theme.muted()));
                }
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}
