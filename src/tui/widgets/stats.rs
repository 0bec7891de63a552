//! Stats header widget - token name, fetch time and min/max/avg/Δ

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::{delta_band, Theme};
use crate::types::Stats;

/// Gold amount with 3 decimals
pub fn format_gold(value: f64) -> String {
    format!("{:.3}g", value)
}

/// Spread percentage with 2 decimals
pub fn format_delta(delta: f64) -> String {
    format!("{:.2}%", delta)
}

pub struct StatsHeader<'a> {
    name: &'a str,
    fetched_at: DateTime<Local>,
    stats: Stats,
    theme: Theme,
}

impl<'a> StatsHeader<'a> {
    pub fn new(name: &'a str, fetched_at: DateTime<Local>, stats: Stats, theme: Theme) -> Self {
        Self {
            name,
            fetched_at,
            stats,
            theme,
        }
    }
}

impl Widget for StatsHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let title = Line::from(vec![
            Span::styled(
                self.name.to_string(),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (fetched {})", self.fetched_at.format("%H:%M:%S")),
                Style::default().fg(self.theme.muted()),
            ),
        ]);
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .render(Rect { height: 1, ..area }, buf);

        if area.height < 2 {
            return;
        }

        let label = Style::default().fg(self.theme.muted());
        let value = Style::default().fg(self.theme.gold());
        let stats = Line::from(vec![
            Span::styled("Min ", label),
            Span::styled(format_gold(self.stats.min), value),
            Span::raw("     "),
            Span::styled("Max ", label),
            Span::styled(format_gold(self.stats.max), value),
            Span::raw("     "),
            Span::styled("Avg ", label),
            Span::styled(format_gold(self.stats.avg), value),
            Span::raw("     "),
            Span::styled("Δ ", label),
            Span::styled(
                format_delta(self.stats.delta),
                Style::default()
                    .fg(self.theme.delta_color(delta_band(self.stats.delta)))
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(stats).alignment(Alignment::Center).render(
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
            buf,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gold() {
        assert_eq!(format_gold(123.4567), "123.457g");
        assert_eq!(format_gold(0.0), "0.000g");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(200.0), "200.00%");
        assert_eq!(format_delta(12.346), "12.35%");
    }

    #[test]
    fn test_render_stats_line() {
        let area = Rect::new(0, 0, 90, 2);
        let mut buf = Buffer::empty(area);
        let stats = Stats {
            min: 50.0,
            max: 150.0,
            avg: 100.0,
            delta: 200.0,
        };
        StatsHeader::new("Mana Token", Local::now(), stats, Theme::Dark).render(area, &mut buf);

        let title: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        let line: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(title.contains("Mana Token"));
        assert!(line.contains("Min 50.000g"));
        assert!(line.contains("Avg 100.000g"));
        assert!(line.contains("200.00%"));
    }
}
