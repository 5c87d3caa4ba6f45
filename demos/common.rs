//! Shared utilities for demos.
//!
//! Provides common functionality used across demos:
//! - Command-line argument parsing
//! - Logging initialization

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "config/swaglabs.toml";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub config: PathBuf,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let config = args
            .iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1))
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

        Self {
            debug: args.iter().any(|a| a == "--debug"),
            config,
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging. `RUST_LOG` wins over `--debug`.
pub fn init_logging(debug: bool) {
    let fallback = if debug {
        "swaglabs_pages=debug"
    } else {
        "swaglabs_pages=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
