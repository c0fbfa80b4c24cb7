//! Core types and configuration for the tsflow pipelines.
//!
//! This crate provides shared types used across all other crates:
//! - Record schemas for both pipelines (prices, spot rates, snapshots)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
