//! Dashboard application state
//!
//! Holds the fetched tokens, the active tab, view options and the checkbox
//! marks. Storage is injected through [`CheckboxStore`]; the mapping is read
//! once on construction and written back on every toggle.

use chrono::Local;
use tracing::{info, warn};

use super::checkbox_store::CheckboxStore;
use super::fetcher::FetchResult;
use super::normalizer::parse_leading_float;
use super::processor::{QuoteProcessor, TokenView, ViewOptions};
use crate::types::{
    checkbox_key, CheckboxFlags, CheckboxState, Mark, SortColumn, SortConfig, TokenData,
};

/// Profit threshold used when the input is empty, malformed or zero
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// Parse the threshold input the lenient way; 0 and garbage fall back to the default
pub fn parse_threshold(text: &str) -> f64 {
    match parse_leading_float(text) {
        Some(v) if v != 0.0 => v,
        _ => DEFAULT_THRESHOLD,
    }
}

/// Application state for the token dashboard
pub struct Dashboard {
    tokens: Vec<TokenData>,
    active: Option<String>,
    checkboxes: CheckboxState,
    store: Box<dyn CheckboxStore>,
    processor: QuoteProcessor<'static>,
    sort: Option<SortConfig>,
    hide_low_pop: bool,
    show_all_servers: bool,
    threshold_input: String,
}

impl Dashboard {
    /// Create a dashboard, loading persisted marks from `store`
    pub fn new(store: Box<dyn CheckboxStore>, threshold: f64) -> Self {
        let checkboxes = match store.load() {
            Ok(state) => state,
            Err(warning) => {
                warn!(warning = warning.message(), "checkbox store unreadable, starting empty");
                CheckboxState::new()
            }
        };

        Self {
            tokens: Vec::new(),
            active: None,
            checkboxes,
            store,
            processor: QuoteProcessor::default(),
            sort: None,
            hide_low_pop: false,
            show_all_servers: false,
            threshold_input: format_threshold(threshold),
        }
    }

    pub fn tokens(&self) -> &[TokenData] {
        &self.tokens
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_token(&self) -> Option<&TokenData> {
        let id = self.active.as_deref()?;
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn active_index(&self) -> Option<usize> {
        let id = self.active.as_deref()?;
        self.tokens.iter().position(|t| t.id == id)
    }

    /// Turn a fetch result into a token and make it active.
    ///
    /// The token id is the backend's item name, or the fragment when none was
    /// reported. A token with the same id is refreshed in place so its marks
    /// stay attached. Returns the id.
    pub fn ingest(&mut self, fragment: &str, result: FetchResult) -> String {
        let id = result
            .item_name
            .clone()
            .unwrap_or_else(|| fragment.to_string());
        let rows = self
            .processor
            .build_rows(&result.rows, self.show_all_servers);

        let token = TokenData {
            id: id.clone(),
            name: id.clone(),
            rows,
            fetched_at: Local::now(),
        };

        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(existing) => {
                info!(token = %id, raw_rows = result.rows.len(), "token refreshed");
                *existing = token;
            }
            None => {
                info!(token = %id, raw_rows = result.rows.len(), "token added");
                self.tokens.push(token);
            }
        }

        self.active = Some(id.clone());
        id
    }

    /// Remove a token; removing the active one activates the first remaining token
    pub fn remove_token(&mut self, id: &str) {
        self.tokens.retain(|t| t.id != id);
        if self.active.as_deref() == Some(id) {
            self.active = self.tokens.first().map(|t| t.id.clone());
        }
        info!(token = %id, "token removed");
    }

    pub fn select(&mut self, id: &str) {
        if self.tokens.iter().any(|t| t.id == id) {
            self.active = Some(id.to_string());
        }
    }

    /// Activate the next token (wrapping)
    pub fn select_next(&mut self) {
        self.select_offset(1);
    }

    /// Activate the previous token (wrapping)
    pub fn select_prev(&mut self) {
        self.select_offset(self.tokens.len().saturating_sub(1));
    }

    fn select_offset(&mut self, offset: usize) {
        if self.tokens.is_empty() {
            return;
        }
        let current = self.active_index().unwrap_or(0);
        let next = (current + offset) % self.tokens.len();
        self.active = Some(self.tokens[next].id.clone());
    }

    /// Marks for a token/server pair (both unset when never toggled)
    pub fn flags(&self, token_id: &str, server: &str) -> CheckboxFlags {
        self.checkboxes
            .get(&checkbox_key(token_id, server))
            .copied()
            .unwrap_or_default()
    }

    pub fn checkboxes(&self) -> &CheckboxState {
        &self.checkboxes
    }

    /// Set one mark and persist the whole mapping (best effort)
    pub fn set_mark(&mut self, token_id: &str, server: &str, mark: Mark, value: bool) {
        let mut flags = self.flags(token_id, server);
        match mark {
            Mark::Bought => flags.bought = value,
            Mark::OnSale => flags.on_sale = value,
        }
        self.checkboxes.insert(checkbox_key(token_id, server), flags);

        if let Err(e) = self.store.save(&self.checkboxes) {
            warn!(error = %e, "failed to persist checkbox state");
        }
    }

    /// Flip one mark, returning its new value
    pub fn toggle_mark(&mut self, token_id: &str, server: &str, mark: Mark) -> bool {
        let flags = self.flags(token_id, server);
        let value = match mark {
            Mark::Bought => !flags.bought,
            Mark::OnSale => !flags.on_sale,
        };
        self.set_mark(token_id, server, mark, value);
        value
    }

    pub fn sort(&self) -> Option<SortConfig> {
        self.sort
    }

    /// Select a sort column; re-selecting an ascending column makes it descending
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = Some(SortConfig::toggled(self.sort, column));
    }

    pub fn hide_low_pop(&self) -> bool {
        self.hide_low_pop
    }

    pub fn toggle_hide_low_pop(&mut self) {
        self.hide_low_pop = !self.hide_low_pop;
    }

    /// Whether the next search also lists servers outside the reference list
    pub fn show_all_servers(&self) -> bool {
        self.show_all_servers
    }

    pub fn toggle_show_all_servers(&mut self) {
        self.show_all_servers = !self.show_all_servers;
    }

    pub fn threshold_input(&self) -> &str {
        &self.threshold_input
    }

    pub fn threshold_input_mut(&mut self) -> &mut String {
        &mut self.threshold_input
    }

    /// Effective profit threshold
    pub fn threshold(&self) -> f64 {
        parse_threshold(&self.threshold_input)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            hide_low_pop: self.hide_low_pop,
            threshold: self.threshold(),
            sort: self.sort,
        }
    }

    /// Rows and stats of a token under the current options
    pub fn view(&self, token: &TokenData) -> TokenView {
        self.processor.view(token, &self.view_options())
    }
}

/// Render a threshold for the input field ("20" rather than "20.0")
fn format_threshold(threshold: f64) -> String {
    if threshold.fract() == 0.0 {
        format!("{:.0}", threshold)
    } else {
        threshold.to_string()
    }
}
