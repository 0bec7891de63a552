//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::types::Signal;

/// Spread band for coloring the Δ statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaBand {
    Flat,
    Low,
    Medium,
    High,
    Extreme,
}

/// Classify a max/min spread percentage.
/// Bands: <15 flat, <30 low, <60 medium, <100 high, otherwise extreme.
pub fn delta_band(delta: f64) -> DeltaBand {
    if delta < 15.0 {
        DeltaBand::Flat
    } else if delta < 30.0 {
        DeltaBand::Low
    } else if delta < 60.0 {
        DeltaBand::Medium
    } else if delta < 100.0 {
        DeltaBand::High
    } else {
        DeltaBand::Extreme
    }
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys, focused input)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Gold amounts
    pub fn gold(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// BUY signal and "bought" mark
    pub fn buy(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// SELL signal
    pub fn sell(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// IGNORE signal and "on sale" mark
    pub fn ignore(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(214), // amber (ANSI 256)
            Self::Light => Color::Indexed(136),
        }
    }

    /// Background of the selected table row
    pub fn selection(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(236),
            Self::Light => Color::Indexed(254),
        }
    }

    pub fn signal_color(self, signal: Signal) -> Color {
        match signal {
            Signal::Buy => self.buy(),
            Signal::Sell => self.sell(),
            Signal::Ignore => self.ignore(),
        }
    }

    pub fn delta_color(self, band: DeltaBand) -> Color {
        match (self, band) {
            (_, DeltaBand::Flat) => self.muted(),
            (_, DeltaBand::Low) => self.buy(),
            (Self::Dark, DeltaBand::Medium) => Color::Blue,
            (Self::Light, DeltaBand::Medium) => Color::Indexed(25),
            (Self::Dark, DeltaBand::High) => Color::Magenta,
            (Self::Light, DeltaBand::High) => Color::Indexed(90),
            (Self::Dark, DeltaBand::Extreme) => Color::Indexed(208), // orange
            (Self::Light, DeltaBand::Extreme) => Color::Indexed(166),
        }
    }
}
