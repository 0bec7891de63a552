//! `undermine check` subcommand: one-shot fetch printed to stdout

use chrono::{DateTime, Local};
use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::services::{Dashboard, HttpQuoteSource, JsonFileStore, QuoteSource};
use crate::types::{QuoteRow, Result, SortColumn, Stats, UndermineError};

/// Fetch one item and print its quote table
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Item fragment, e.g. #eu-draenor/238028-701
    #[arg(value_name = "FRAGMENT")]
    pub fragment: String,

    /// Hide servers below 150k population
    #[arg(long)]
    pub hide_low_pop: bool,

    /// Also list servers outside the reference list
    #[arg(long)]
    pub all_servers: bool,

    /// Sort column
    #[arg(long, value_enum)]
    pub sort: Option<SortColumn>,

    /// Sort descending (requires --sort)
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    id: &'a str,
    fetched_at: DateTime<Local>,
    threshold: f64,
    stats: Stats,
    rows: &'a [QuoteRow],
}

impl CheckArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let source = HttpQuoteSource::new(&config.endpoint, config.timeout)?;
        let store = JsonFileStore::new(&config.data_dir);
        let output = self.execute(&source, Dashboard::new(Box::new(store), config.threshold))?;
        print!("{}", output);
        Ok(())
    }

    /// Fetch, process and format; returns the text to print
    fn execute(&self, source: &dyn QuoteSource, mut dashboard: Dashboard) -> Result<String> {
        if self.fragment.trim().is_empty() {
            return Err(UndermineError::Config("FRAGMENT must not be empty".into()));
        }

        if self.all_servers {
            dashboard.toggle_show_all_servers();
        }
        if self.hide_low_pop {
            dashboard.toggle_hide_low_pop();
        }
        if let Some(column) = self.sort {
            dashboard.sort_by(column);
            if self.desc {
                dashboard.sort_by(column);
            }
        }

        let result = source.fetch(&self.fragment);
        dashboard.ingest(&self.fragment, result);
        let token = dashboard
            .active_token()
            .ok_or_else(|| UndermineError::Fetch("no token after search".into()))?;
        let view = dashboard.view(token);

        if self.json {
            let report = CheckReport {
                id: &token.id,
                fetched_at: token.fetched_at,
                threshold: dashboard.threshold(),
                stats: view.stats,
                rows: &view.rows,
            };
            let mut json = serde_json::to_string_pretty(&report)
                .map_err(|e| UndermineError::Parse(e.to_string()))?;
            json.push('\n');
            return Ok(json);
        }

        let mut out = format!("{}\n", token.name);
        out.push_str(&format!(
            "Min {:.3}g  Max {:.3}g  Avg {:.3}g  Δ {:.2}%\n",
            view.stats.min, view.stats.max, view.stats.avg, view.stats.delta
        ));
        out.push_str(&format!(
            "{:<8}{:<22}{:<6}{:>14}{:>14}{:>11}{:>9}\n",
            "Pop.", "Server", "B A", "Gold", "Min Sell", "% PROF", "Signal"
        ));
        for quote in &view.rows {
            let flags = dashboard.flags(&token.id, &quote.row.server);
            let marks = format!(
                "{} {}",
                if flags.bought { "x" } else { "-" },
                if flags.on_sale { "x" } else { "-" }
            );
            out.push_str(&format!(
                "{:<8}{:<22}{:<6}{:>14.3}{:>14.3}{:>10.2}%{:>9}\n",
                quote.row.population_text,
                quote.row.server,
                marks,
                quote.row.gold,
                quote.min_sell,
                quote.profit,
                quote.signal.label(),
            ));
        }
        Ok(out)
    }
}
