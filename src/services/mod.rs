//! Services for quote fetching, processing and persistence

pub mod checkbox_store;
pub mod dashboard;
pub mod fetcher;
pub mod normalizer;
pub mod processor;
pub mod servers;

pub use checkbox_store::{CheckboxStore, JsonFileStore};
pub use dashboard::Dashboard;
pub use fetcher::{FetchResult, HttpQuoteSource, QuoteSource};
pub use processor::{QuoteProcessor, TokenView, ViewOptions};
