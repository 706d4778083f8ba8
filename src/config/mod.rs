//! Configuration module for Spacer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; anything left out falls back to the defaults in
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use spacer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spacer.toml")).unwrap();
//! println!("Fetching from: {}", config.client.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, Config, RetryConfig, StorageConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
