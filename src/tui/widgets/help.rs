//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 21;

/// Keybinding sections: (header, [(key, description)])
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Search",
        &[
            ("/ or s", "Edit fragment"),
            ("Enter", "Run search"),
            ("t", "Edit % PROF threshold"),
            ("Esc", "Leave input"),
        ],
    ),
    (
        "Table",
        &[
            ("Tab / Shift+Tab", "Switch token"),
            ("Up/Down or j/k", "Select row"),
            ("b / a", "Toggle bought / on sale"),
            ("1-5", "Sort column (again: desc)"),
            ("p / o", "Low-pop / all servers"),
            ("x", "Remove token"),
        ],
    ),
    ("General", &[("q / Ctrl+C", "Quit"), ("?", "Toggle help")]),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" undermine v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (header, bindings) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *header,
                Style::default()
                    .fg(self.theme.gold())
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, desc) in bindings.iter() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", key),
                        Style::default().fg(self.theme.accent()),
                    ),
                    Span::styled(*desc, Style::default().fg(self.theme.text())),
                ]));
            }
            lines.push(Line::raw(""));
        }

        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
        Paragraph::new(lines).render(chunks[0], buf);

        let hint = Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        ));
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}
