//! undermine: token price dashboard across game servers

pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;
