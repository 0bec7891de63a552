//! Quote processor
//!
//! Matches raw backend rows against the reference server list and derives
//! per-token statistics, profit percentages, signals and resale floors.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::normalizer::{format_population_text, names_match, parse_gold, parse_qty};
use super::servers::{self, LOW_POP_CUTOFF, REFERENCE_SERVERS};
use crate::types::{
    QuoteRow, RawRow, ServerEntry, Signal, SortColumn, SortConfig, SortDirection, Stats,
    TokenData, TokenRow,
};

/// Auction house cut applied to the resale floor
const AUCTION_CUT: f64 = 0.95;

/// Markup over the purchase price a resale should clear
const RESALE_MARKUP: f64 = 1.3;

/// How a token's rows should be presented
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub hide_low_pop: bool,
    /// Profit percentage at which a row becomes BUY or SELL
    pub threshold: f64,
    pub sort: Option<SortConfig>,
}

/// Rows and stats ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct TokenView {
    pub rows: Vec<QuoteRow>,
    pub stats: Stats,
}

/// Quote processor bound to a reference server list
#[derive(Debug, Clone, Copy)]
pub struct QuoteProcessor<'a> {
    servers: &'a [ServerEntry],
}

impl Default for QuoteProcessor<'static> {
    fn default() -> Self {
        Self::new(REFERENCE_SERVERS)
    }
}

impl<'a> QuoteProcessor<'a> {
    pub fn new(servers: &'a [ServerEntry]) -> Self {
        Self { servers }
    }

    /// Build token rows from raw backend rows.
    ///
    /// Every reference server gets exactly one row, in reference order, using
    /// the first loosely matching raw row (zero price/qty when none match).
    /// With `include_others`, raw rows naming servers outside the reference
    /// list are appended once each.
    pub fn build_rows(&self, raw: &[RawRow], include_others: bool) -> Vec<TokenRow> {
        let mut rows: Vec<TokenRow> = self
            .servers
            .iter()
            .map(|server| {
                let (gold, qty) = find_quote(raw, server.name);
                TokenRow {
                    server: server.name.to_string(),
                    population_text: format_population_text(Some(server.population)),
                    population_value: server.population,
                    gold,
                    qty,
                }
            })
            .collect();

        if include_others {
            rows.extend(self.other_rows(raw));
        }

        rows
    }

    /// Rows for servers outside the reference list, deduplicated case-insensitively
    fn other_rows(&self, raw: &[RawRow]) -> Vec<TokenRow> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut others = Vec::new();

        for r in raw {
            let name = r.server.trim();
            if name.is_empty() || servers::is_known(self.servers, name) {
                continue;
            }
            if !seen.insert(name.to_lowercase()) {
                continue;
            }
            others.push(TokenRow {
                server: name.to_string(),
                population_text: format_population_text(None),
                population_value: 0,
                gold: parse_gold(&r.price),
                qty: parse_qty(&r.quantity),
            });
        }

        others
    }

    /// Compute the display view of a token
    pub fn view(&self, token: &TokenData, options: &ViewOptions) -> TokenView {
        let visible = visible_rows(&token.rows, options.hide_low_pop);
        let stats = compute_stats(visible.iter().map(|r| r.gold));

        let mut rows: Vec<QuoteRow> = visible
            .into_iter()
            .map(|row| {
                let profit = profit_percent(row.gold, stats.avg);
                QuoteRow {
                    row: row.clone(),
                    profit,
                    signal: classify(profit, options.threshold),
                    min_sell: min_sell_price(row.gold),
                }
            })
            .collect();

        if let Some(sort) = options.sort {
            self.sort_rows(&mut rows, sort);
        }

        TokenView { rows, stats }
    }

    /// Stable sort by column; equal keys keep their current order
    pub fn sort_rows(&self, rows: &mut [QuoteRow], sort: SortConfig) {
        rows.sort_by(|a, b| {
            let ord = match sort.column {
                SortColumn::Population => a.row.population_value.cmp(&b.row.population_value),
                SortColumn::Server => servers::order_index(self.servers, &a.row.server)
                    .cmp(&servers::order_index(self.servers, &b.row.server)),
                SortColumn::Gold => cmp_f64(a.row.gold, b.row.gold),
                SortColumn::MinSell => cmp_f64(a.min_sell, b.min_sell),
                SortColumn::Profit => cmp_f64(a.profit, b.profit),
            };
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

/// NaN-safe float comparison (NaN compares equal)
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Price and quantity of the first raw row loosely naming `server`
fn find_quote(raw: &[RawRow], server: &str) -> (f64, u64) {
    raw.iter()
        .find(|r| names_match(&r.server, server))
        .map(|r| (parse_gold(&r.price), parse_qty(&r.quantity)))
        .unwrap_or((0.0, 0))
}

/// Rows left after the optional low-population filter, in original order
pub fn visible_rows(rows: &[TokenRow], hide_low_pop: bool) -> Vec<&TokenRow> {
    rows.iter()
        .filter(|r| !hide_low_pop || r.population_value >= LOW_POP_CUTOFF)
        .collect()
}

/// Min/max/mean over priced values; unpriced (0) values are ignored.
/// Delta is the max-over-min spread in percent, 0 when min is 0.
pub fn compute_stats(golds: impl IntoIterator<Item = f64>) -> Stats {
    let priced: Vec<f64> = golds.into_iter().filter(|g| *g > 0.0).collect();
    if priced.is_empty() {
        return Stats::default();
    }

    let min = priced.iter().copied().fold(f64::INFINITY, f64::min);
    let max = priced.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = priced.iter().sum::<f64>() / priced.len() as f64;
    let delta = if min > 0.0 {
        (max - min) / min * 100.0
    } else {
        0.0
    };

    Stats {
        min,
        max,
        avg,
        delta,
    }
}

/// Deviation of `gold` from the mean in percent, 0 when the mean is 0
pub fn profit_percent(gold: f64, avg: f64) -> f64 {
    if avg > 0.0 {
        (gold - avg) / avg * 100.0
    } else {
        0.0
    }
}

/// BUY at or below -threshold, SELL at or above +threshold
pub fn classify(profit: f64, threshold: f64) -> Signal {
    if profit <= -threshold {
        Signal::Buy
    } else if profit >= threshold {
        Signal::Sell
    } else {
        Signal::Ignore
    }
}

/// Lowest listing price that still clears the markup after the auction cut
pub fn min_sell_price(gold: f64) -> f64 {
    if gold > 0.0 {
        AUCTION_CUT * (gold * RESALE_MARKUP)
    } else {
        0.0
    }
}
