//! Quote types for cross-server token pricing

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Known server with its fixed population estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerEntry {
    pub name: &'static str,
    pub population: u32,
}

/// One raw row as returned by the quote backend, every cell rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub server: String,
    pub population: String,
    pub price: String,
    pub quantity: String,
}

impl RawRow {
    pub fn new(server: &str, price: &str, quantity: &str) -> Self {
        Self {
            server: server.to_string(),
            population: String::new(),
            price: price.to_string(),
            quantity: quantity.to_string(),
        }
    }
}

/// Parsed per-server row of a token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRow {
    pub server: String,
    pub population_text: String,
    pub population_value: u32,
    pub gold: f64,
    pub qty: u64,
}

/// One search result
#[derive(Debug, Clone)]
pub struct TokenData {
    pub id: String,
    pub name: String,
    pub rows: Vec<TokenRow>,
    pub fetched_at: DateTime<Local>,
}

/// Per-row user marks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxFlags {
    #[serde(default)]
    pub bought: bool,
    #[serde(default, rename = "onSale")]
    pub on_sale: bool,
}

/// Which of the two per-row marks to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bought,
    OnSale,
}

/// Persisted marks keyed by `"{token_id}_{server}"`
pub type CheckboxState = BTreeMap<String, CheckboxFlags>;

/// Composite storage key for a token/server pair
pub fn checkbox_key(token_id: &str, server: &str) -> String {
    format!("{}_{}", token_id, server)
}

/// Derived price statistics over the visible, priced rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Spread between max and min as a percentage of min
    pub delta: f64,
}

/// Price opportunity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Ignore,
}

impl Signal {
    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Ignore => "IGNORE",
        }
    }
}

/// Token row enriched with profit, signal and resale floor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    #[serde(flatten)]
    pub row: TokenRow,
    pub profit: f64,
    pub signal: Signal,
    pub min_sell: f64,
}

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortColumn {
    Population,
    Server,
    Gold,
    MinSell,
    Profit,
}

impl SortColumn {
    pub fn label(self) -> &'static str {
        match self {
            Self::Population => "Pop.",
            Self::Server => "Server",
            Self::Gold => "Gold",
            Self::MinSell => "Min Sell",
            Self::Profit => "% PROF",
        }
    }

    /// Get column from number key (1-5)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Population),
            2 => Some(Self::Server),
            3 => Some(Self::Gold),
            4 => Some(Self::MinSell),
            5 => Some(Self::Profit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    /// Next sort state after the user selects `column`.
    /// Re-selecting an ascending column flips it; anything else starts ascending.
    pub fn toggled(current: Option<Self>, column: SortColumn) -> Self {
        match current {
            Some(cfg) if cfg.column == column && cfg.direction == SortDirection::Asc => Self {
                column,
                direction: SortDirection::Desc,
            },
            _ => Self::asc(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_key_format() {
        assert_eq!(checkbox_key("Mana Token", "Draenor"), "Mana Token_Draenor");
    }

    #[test]
    fn test_checkbox_flags_serde_uses_on_sale_camel_case() {
        let flags = CheckboxFlags {
            bought: true,
            on_sale: false,
        };
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"{"bought":true,"onSale":false}"#);

        let parsed: CheckboxFlags = serde_json::from_str(r#"{"onSale":true}"#).unwrap();
        assert!(!parsed.bought);
        assert!(parsed.on_sale);
    }

    #[test]
    fn test_signal_labels() {
        assert_eq!(Signal::Buy.label(), "BUY");
        assert_eq!(Signal::Sell.label(), "SELL");
        assert_eq!(Signal::Ignore.label(), "IGNORE");
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), r#""BUY""#);
    }

    #[test]
    fn test_sort_toggle_flips_ascending_column() {
        let first = SortConfig::toggled(None, SortColumn::Gold);
        assert_eq!(first, SortConfig::asc(SortColumn::Gold));

        let second = SortConfig::toggled(Some(first), SortColumn::Gold);
        assert_eq!(second.direction, SortDirection::Desc);

        // Descending goes back to ascending
        let third = SortConfig::toggled(Some(second), SortColumn::Gold);
        assert_eq!(third.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_toggle_other_column_starts_ascending() {
        let current = SortConfig {
            column: SortColumn::Gold,
            direction: SortDirection::Desc,
        };
        let next = SortConfig::toggled(Some(current), SortColumn::Profit);
        assert_eq!(next, SortConfig::asc(SortColumn::Profit));
    }

    #[test]
    fn test_sort_column_from_number() {
        assert_eq!(SortColumn::from_number(1), Some(SortColumn::Population));
        assert_eq!(SortColumn::from_number(5), Some(SortColumn::Profit));
        assert_eq!(SortColumn::from_number(0), None);
        assert_eq!(SortColumn::from_number(6), None);
    }
}
