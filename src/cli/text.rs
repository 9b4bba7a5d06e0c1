//! Type command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::warn;

use crate::config::{loader, load_fonts, MarqueeConfig};
use crate::glyph::Font;

use super::{open_editor, write_outputs, EXIT_INVALID_ARGS};

/// Where the glyphs come from
pub enum FontChoice {
    /// First font in the [fonts] table
    Default,
    Named(String),
    File(PathBuf),
}

impl FontChoice {
    pub fn new(name: Option<String>, file: Option<PathBuf>) -> Self {
        match (name, file) {
            (_, Some(file)) => FontChoice::File(file),
            (Some(name), None) => FontChoice::Named(name),
            (None, None) => FontChoice::Default,
        }
    }

    fn load(&self, config: &MarqueeConfig) -> Result<Font, String> {
        if let FontChoice::File(path) = self {
            let name = path.display().to_string();
            return loader::load_font(&name, path).map_err(|e| e.to_string());
        }
        let mut fonts = load_fonts(config).map_err(|e| e.to_string())?;
        match self {
            FontChoice::Named(name) => {
                fonts.remove(name).ok_or_else(|| format!("Unknown font '{}'", name))
            }
            _ => fonts
                .into_values()
                .next()
                .ok_or_else(|| "No fonts configured; add a [fonts] table or pass --font-file".to_string()),
        }
    }
}

/// Execute the type command
#[allow(clippy::too_many_arguments)]
pub fn run_type(
    config: &MarqueeConfig,
    text: &str,
    font: FontChoice,
    color: Option<usize>,
    document: Option<&Path>,
    output: &Path,
    png: Option<&Path>,
) -> ExitCode {
    let font = match font.load(config) {
        Ok(font) => font,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut state = match open_editor(config, document) {
        Ok(state) => state,
        Err(code) => return code,
    };
    if let Some(color) = color {
        if let Err(e) = state.set_color(color) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    if state.on_submit_text(&font, text) == 0 {
        warn!("'{}' produced no tiles", text);
    }

    write_outputs(config, &state, output, png)
}
