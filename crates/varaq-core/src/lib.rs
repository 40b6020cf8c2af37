// SPDX-License-Identifier: MIT
//
// Varaq — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::ScannerConfig;
pub use error::VaraqError;
pub use types::*;
