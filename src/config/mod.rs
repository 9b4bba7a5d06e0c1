//! Editor configuration
//!
//! Provides types and parsing for `marquee.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_fonts, ConfigError, CONFIG_FILE};
pub use schema::*;
