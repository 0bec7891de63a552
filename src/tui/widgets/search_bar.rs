//! Search bar widget: fragment input, profit threshold and filter toggles

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Placeholder shown in an empty fragment field
const FRAGMENT_PLACEHOLDER: &str = "#eu-draenor/238028-701";

/// Which input currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Search,
    Threshold,
}

/// State rendered by the search bar
pub struct SearchBarState<'a> {
    pub fragment: &'a str,
    pub threshold: &'a str,
    pub focus: Focus,
    pub loading: bool,
    /// Low-population servers are shown (filter off)
    pub show_low_pop: bool,
    pub show_all_servers: bool,
}

pub struct SearchBar<'a> {
    state: SearchBarState<'a>,
    theme: Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(state: SearchBarState<'a>, theme: Theme) -> Self {
        Self { state, theme }
    }

    fn checkbox(checked: bool) -> &'static str {
        if checked {
            "[x]"
        } else {
            "[ ]"
        }
    }

    fn field_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text())
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let s = &self.state;
        let label = Style::default().fg(self.theme.muted());
        let cursor = |focused: bool| if focused { "▏" } else { "" };

        let search_focused = s.focus == Focus::Search;
        let fragment = if s.fragment.is_empty() && !search_focused {
            Span::styled(FRAGMENT_PLACEHOLDER, label)
        } else {
            Span::styled(
                format!("{}{}", s.fragment, cursor(search_focused)),
                self.field_style(search_focused),
            )
        };

        let button = if s.loading {
            Span::styled("  searching…", Style::default().fg(self.theme.muted()))
        } else {
            Span::raw("")
        };

        let threshold_focused = s.focus == Focus::Threshold;
        let top = Line::from(vec![
            Span::styled(" Fragment: ", label),
            fragment,
            button,
            Span::raw("    "),
            Span::styled("% PROF: ", label),
            Span::styled(
                format!("{}{}", s.threshold, cursor(threshold_focused)),
                self.field_style(threshold_focused),
            ),
        ]);
        Paragraph::new(top).render(Rect { height: 1, ..area }, buf);

        if area.height < 2 {
            return;
        }
        let filters = Line::from(vec![
            Span::styled(
                format!(" {} ", Self::checkbox(s.show_low_pop)),
                Style::default().fg(self.theme.accent()),
            ),
            Span::styled("Show low-populated servers (p)", label),
            Span::raw("    "),
            Span::styled(
                format!("{} ", Self::checkbox(s.show_all_servers)),
                Style::default().fg(self.theme.accent()),
            ),
            Span::styled("All servers on next search (o)", label),
        ]);
        Paragraph::new(filters).render(
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
            buf,
        );
    }
}
