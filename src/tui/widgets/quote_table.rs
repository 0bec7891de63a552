//! Quote table widget - one row per server with marks, prices and signal

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::types::{CheckboxFlags, QuoteRow, SortColumn, SortConfig, SortDirection};

/// Table width: Pop(8) + Server(22) + Marks(8) + Gold(14) + MinSell(14) + Profit(11) + Signal(9) = 86
const TABLE_WIDTH: u16 = 86;

/// Signed profit percentage with 2 decimals
pub fn format_profit(profit: f64) -> String {
    if profit >= 0.0 {
        format!("+{:.2}%", profit)
    } else {
        format!("{:.2}%", profit)
    }
}

/// First visible row so that `selected` stays inside a window of `height` rows
pub fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}

fn header_label(column: SortColumn, sort: Option<SortConfig>) -> String {
    let arrow = match sort {
        Some(cfg) if cfg.column == column => match cfg.direction {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        },
        _ => "",
    };
    format!("{}{}", column.label(), arrow)
}

/// Row with its persisted marks
pub struct TableRow<'a> {
    pub quote: &'a QuoteRow,
    pub flags: CheckboxFlags,
}

pub struct QuoteTable<'a> {
    rows: Vec<TableRow<'a>>,
    selected: usize,
    sort: Option<SortConfig>,
    theme: Theme,
}

impl<'a> QuoteTable<'a> {
    pub fn new(rows: Vec<TableRow<'a>>, selected: usize, sort: Option<SortConfig>, theme: Theme) -> Self {
        Self {
            rows,
            selected,
            sort,
            theme,
        }
    }

    fn table_area(&self, area: Rect) -> Rect {
        let offset = area.width.saturating_sub(TABLE_WIDTH) / 2;
        Rect {
            x: area.x + offset,
            width: TABLE_WIDTH.min(area.width),
            ..area
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted());

        let header = Line::from(vec![
            Span::styled(format!("{:<8}", header_label(SortColumn::Population, self.sort)), bold),
            Span::styled(format!("{:<22}", header_label(SortColumn::Server, self.sort)), bold),
            Span::styled(format!("{:<8}", "B  A"), muted),
            Span::styled(format!("{:>14}", header_label(SortColumn::Gold, self.sort)), bold),
            Span::styled(format!("{:>14}", header_label(SortColumn::MinSell, self.sort)), bold),
            Span::styled(format!("{:>11}", header_label(SortColumn::Profit, self.sort)), bold),
            Span::styled(format!("{:>9}", "Signal"), bold),
        ]);
        Paragraph::new(header)
            .alignment(Alignment::Left)
            .render(self.table_area(area), buf);
    }

    fn render_row(&self, row: &TableRow, selected: bool, area: Rect, buf: &mut Buffer) {
        let quote = row.quote;
        let mark = |on: bool| if on { "■" } else { "□" };
        let signal_color = self.theme.signal_color(quote.signal);

        // UTF-8 safe truncation of long server names
        let server = if quote.row.server.chars().count() > 21 {
            format!("{}…", quote.row.server.chars().take(20).collect::<String>())
        } else {
            quote.row.server.clone()
        };

        let line = Line::from(vec![
            Span::styled(
                format!("{:<8}", quote.row.population_text),
                Style::default().fg(self.theme.muted()),
            ),
            Span::styled(format!("{:<22}", server), Style::default().fg(self.theme.text())),
            Span::styled(
                format!("{}  ", mark(row.flags.bought)),
                Style::default().fg(self.theme.buy()),
            ),
            Span::styled(
                format!("{:<5}", mark(row.flags.on_sale)),
                Style::default().fg(self.theme.ignore()),
            ),
            Span::styled(
                format!("{:>14}", format!("{:.3}", quote.row.gold)),
                Style::default().fg(self.theme.gold()),
            ),
            Span::styled(
                format!("{:>14}", format!("{:.3}", quote.min_sell)),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(
                format!("{:>11}", format_profit(quote.profit)),
                Style::default().fg(signal_color),
            ),
            Span::styled(
                format!("{:>9}", quote.signal.label()),
                Style::default()
                    .fg(signal_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let mut paragraph = Paragraph::new(line).alignment(Alignment::Left);
        if selected {
            paragraph = paragraph.style(Style::default().bg(self.theme.selection()));
        }
        paragraph.render(self.table_area(area), buf);
    }
}

impl Widget for QuoteTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }

        self.render_header(Rect { height: 1, ..area }, buf);

        let body_height = (area.height - 1) as usize;
        let offset = scroll_offset(self.selected, body_height);

        for (i, row) in self.rows.iter().skip(offset).take(body_height).enumerate() {
            let y = area.y + 1 + i as u16;
            let row_area = Rect { y, height: 1, ..area };
            self.render_row(row, offset + i == self.selected, row_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Signal, TokenRow};

    fn quote(server: &str, gold: f64, profit: f64, signal: Signal) -> QuoteRow {
        QuoteRow {
            row: TokenRow {
                server: server.to_string(),
                population_text: "260k+".to_string(),
                population_value: 260_000,
                gold,
                qty: 1,
            },
            profit,
            signal,
            min_sell: gold * 1.235,
        }
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_format_profit_sign() {
        assert_eq!(format_profit(12.5), "+12.50%");
        assert_eq!(format_profit(0.0), "+0.00%");
        assert_eq!(format_profit(-50.0), "-50.00%");
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(20, 10), 11);
        assert_eq!(scroll_offset(5, 0), 0);
    }

    #[test]
    fn test_header_marks_sorted_column() {
        let sort = Some(SortConfig {
            column: SortColumn::Gold,
            direction: SortDirection::Desc,
        });
        assert_eq!(header_label(SortColumn::Gold, sort), "Gold▼");
        assert_eq!(header_label(SortColumn::Server, sort), "Server");
        assert_eq!(
            header_label(SortColumn::Server, Some(SortConfig::asc(SortColumn::Server))),
            "Server▲"
        );
    }

    #[test]
    fn test_render_rows_and_marks() {
        let rows = [
            quote("Kazzak", 50.0, -50.0, Signal::Buy),
            quote("Draenor", 150.0, 50.0, Signal::Sell),
        ];
        let table_rows = vec![
            TableRow {
                quote: &rows[0],
                flags: CheckboxFlags {
                    bought: true,
                    on_sale: false,
                },
            },
            TableRow {
                quote: &rows[1],
                flags: CheckboxFlags::default(),
            },
        ];

        let area = Rect::new(0, 0, TABLE_WIDTH, 4);
        let mut buf = Buffer::empty(area);
        QuoteTable::new(table_rows, 0, None, Theme::Dark).render(area, &mut buf);

        let header = line(&buf, 0);
        assert!(header.contains("Pop."));
        assert!(header.contains("% PROF"));

        let first = line(&buf, 1);
        assert!(first.contains("Kazzak"));
        assert!(first.contains("■"));
        assert!(first.contains("50.000"));
        assert!(first.contains("-50.00%"));
        assert!(first.contains("BUY"));

        let second = line(&buf, 2);
        assert!(second.contains("Draenor"));
        assert!(second.contains("+50.00%"));
        assert!(second.contains("SELL"));
        assert!(!second.contains("■"));
    }

    #[test]
    fn test_render_scrolls_to_selected() {
        let rows: Vec<QuoteRow> = (0..10)
            .map(|i| quote(&format!("Server{}", i), 10.0, 0.0, Signal::Ignore))
            .collect();
        let table_rows = rows
            .iter()
            .map(|q| TableRow {
                quote: q,
                flags: CheckboxFlags::default(),
            })
            .collect();

        // Header + 3 body rows, selection on the last row
        let area = Rect::new(0, 0, TABLE_WIDTH, 4);
        let mut buf = Buffer::empty(area);
        QuoteTable::new(table_rows, 9, None, Theme::Dark).render(area, &mut buf);

        assert!(line(&buf, 1).contains("Server7"));
        assert!(line(&buf, 3).contains("Server9"));
    }
}
