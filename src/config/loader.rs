//! Configuration loading and discovery for `marquee.toml`
//!
//! Provides functions to find, load, and resolve configuration.

use super::schema::MarqueeConfig;
use crate::glyph::{Font, GlyphError};
use crate::script::FontSet;
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "marquee.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse marquee.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// A configured font could not be read
    #[error("Failed to read font '{name}' from {}: {source}", .path.display())]
    FontIo {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A configured font is not a valid glyph table
    #[error("Font '{name}' in {}: {source}", .path.display())]
    Font {
        name: String,
        path: PathBuf,
        #[source]
        source: GlyphError,
    },
}

/// Find marquee.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for marquee.toml
/// 2. Check XDG_CONFIG_HOME/marquee/marquee.toml (or ~/.config/marquee/marquee.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find marquee.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("marquee").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find marquee.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a marquee.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let editor = config.new_editor()?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<MarqueeConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(default_config())
        }
    }
}

/// Load configuration from a specific file path.
///
/// Relative font paths are rewritten against the directory holding the file.
fn load_config_file(path: &Path) -> Result<MarqueeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: MarqueeConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = config_root(path) {
        for font in config.fonts.values_mut() {
            *font = resolve_path(root, font);
        }
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Configuration used when no marquee.toml is found.
pub fn default_config() -> MarqueeConfig {
    MarqueeConfig::default()
}

/// Read and validate every configured font.
pub fn load_fonts(config: &MarqueeConfig) -> Result<FontSet, ConfigError> {
    let mut fonts = FontSet::new();
    for (name, path) in &config.fonts {
        let font = load_font(name, path)?;
        debug!("font '{}': {} glyph(s)", name, font.len());
        fonts.insert(name.clone(), font);
    }
    Ok(fonts)
}

/// Read and validate one JSON5 glyph table.
pub fn load_font(name: &str, path: &Path) -> Result<Font, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::FontIo {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_json(&text).map_err(|source| ConfigError::Font {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

/// Directory holding a config file.
pub fn config_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the config directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
