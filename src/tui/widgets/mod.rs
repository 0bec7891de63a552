//! TUI widgets

pub mod help;
pub mod quote_table;
pub mod search_bar;
pub mod spinner;
pub mod stats;
pub mod tabs;
