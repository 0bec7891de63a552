//! Type definitions for undermine

mod error;
mod quote;

pub use error::*;
pub use quote::*;

/// Checkbox store loading warning types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// Failed to open or read the store file
    LoadFailed(String),
    /// Store file was corrupted (invalid JSON)
    Corrupted(String),
}

impl StoreWarning {
    pub fn message(&self) -> &str {
        match self {
            Self::LoadFailed(msg) | Self::Corrupted(msg) => msg,
        }
    }
}
