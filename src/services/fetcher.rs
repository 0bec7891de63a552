//! Quote fetch service
//!
//! Posts an item fragment to the local quote backend and decodes the tabular
//! reply. Failures never propagate past [`QuoteSource::fetch`]: they are
//! logged and turn into an empty result.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::normalizer::cell_text;
use crate::types::{RawRow, Result, UndermineError};

/// Default quote backend endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/fetch";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Request body sent to the backend
#[derive(Debug, Serialize)]
struct FetchRequest<'a> {
    fragment: &'a str,
}

/// Backend reply as it arrives on the wire
#[derive(Debug, Deserialize)]
struct FetchReply {
    #[serde(default)]
    item_name: Value,
    #[serde(default)]
    rows: Value,
}

/// Decoded backend reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    /// Display name reported by the backend, if any
    pub item_name: Option<String>,
    pub rows: Vec<RawRow>,
}

impl FetchResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Source of quote rows for an item fragment
pub trait QuoteSource: Send + Sync {
    /// Fetch quotes; failures degrade to [`FetchResult::empty`]
    fn fetch(&self, fragment: &str) -> FetchResult;
}

/// HTTP quote source backed by a blocking reqwest client
pub struct HttpQuoteSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQuoteSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UndermineError::Fetch(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn try_fetch(&self, fragment: &str) -> Result<FetchResult> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&FetchRequest { fragment })
            .send()
            .map_err(|e| UndermineError::Fetch(format!("HTTP request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| UndermineError::Fetch(format!("HTTP status: {}", e)))?;

        let mut body = response
            .bytes()
            .map_err(|e| UndermineError::Fetch(format!("Failed to read body: {}", e)))?
            .to_vec();

        decode_reply(&mut body)
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch(&self, fragment: &str) -> FetchResult {
        match self.try_fetch(fragment) {
            Ok(result) => {
                debug!(
                    fragment,
                    rows = result.rows.len(),
                    item = ?result.item_name,
                    "quote fetch complete"
                );
                result
            }
            Err(e) => {
                warn!(fragment, endpoint = %self.endpoint, error = %e, "quote fetch failed");
                FetchResult::empty()
            }
        }
    }
}

/// Decode a backend reply body. Non-object rows are skipped.
pub fn decode_reply(body: &mut [u8]) -> Result<FetchResult> {
    let reply: FetchReply =
        simd_json::from_slice(body).map_err(|e| UndermineError::Parse(e.to_string()))?;

    // Null or non-array rows count as no rows; the item name still applies
    let rows = reply
        .rows
        .as_array()
        .map(|rows| rows.iter().filter_map(raw_row).collect())
        .unwrap_or_default();
    let item_name = Some(cell_text(&reply.item_name)).filter(|name| !name.trim().is_empty());

    Ok(FetchResult { item_name, rows })
}

/// Convert one JSON row (`Column1`..`Column4`) into a raw row
fn raw_row(value: &Value) -> Option<RawRow> {
    let obj = value.as_object()?;
    let column = |key: &str| obj.get(key).map(cell_text).unwrap_or_default();
    Some(RawRow {
        server: column("Column1"),
        population: column("Column2"),
        price: column("Column3"),
        quantity: column("Column4"),
    })
}
