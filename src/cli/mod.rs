//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod new;
mod render;
mod replay;
mod text;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{self, MarqueeConfig};
use crate::document::Document;
use crate::output;
use crate::tool::EditorState;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Marquee - Compose tile-lattice artwork for LED signs
#[derive(Parser)]
#[command(name = "mrq")]
#[command(about = "Marquee - Compose tile-lattice artwork for LED signs and render it to PNG")]
#[command(version)]
pub struct Cli {
    /// Config file (default: nearest marquee.toml, then $XDG_CONFIG_HOME/marquee)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a blank document with background and border
    New {
        /// Output document (.json)
        output: PathBuf,

        /// Grid width in tiles (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Grid height in tiles (overrides config)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Render a document to PNG
    Render {
        /// Input document (.json)
        input: PathBuf,

        /// Output PNG. If omitted: {input}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Replay a script of editor commands
    Replay {
        /// Script of JSON5 commands, one object per command
        script: PathBuf,

        /// Start from this document instead of a blank one
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Output document. If omitted: {script}.json
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render the result to this PNG
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Typeset text with a configured font
    #[command(name = "type")]
    Type {
        /// Text to typeset
        text: String,

        /// Font name from the [fonts] table (default: first configured)
        #[arg(short, long)]
        font: Option<String>,

        /// Font file to use instead of a configured font
        #[arg(long, conflicts_with = "font")]
        font_file: Option<PathBuf>,

        /// Palette index of the text
        #[arg(short, long)]
        color: Option<usize>,

        /// Start from this document instead of a blank one
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Output document
        #[arg(short, long)]
        output: PathBuf,

        /// Also render the result to this PNG
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Export the user layers of a document as a glyph table
    ExportGlyphs {
        /// Input document (.json)
        input: PathBuf,

        /// Output glyph table. If omitted: {input}.glyphs.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Install the logger. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match cli.command {
        Commands::New { output, width, height } => new::run_new(&config, &output, width, height),
        Commands::Render { input, output, scale } => {
            render::run_render(&config, &input, output.as_deref(), scale)
        }
        Commands::Replay { script, document, output, png } => replay::run_replay(
            &config,
            &script,
            document.as_deref(),
            output.as_deref(),
            png.as_deref(),
        ),
        Commands::Type { text, font, font_file, color, document, output, png } => {
            text::run_type(
                &config,
                &text,
                text::FontChoice::new(font, font_file),
                color,
                document.as_deref(),
                &output,
                png.as_deref(),
            )
        }
        Commands::ExportGlyphs { input, output } => {
            export::run_export_glyphs(&input, output.as_deref())
        }
    }
}

/// Read and validate a document. Reports and maps failures to an exit code.
pub(crate) fn read_document(path: &Path) -> Result<Document, ExitCode> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: Cannot read '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    Document::from_json(&text).map_err(|e| {
        eprintln!("Error: '{}': {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Editor over a document if one is given, else a blank configured editor.
pub(crate) fn open_editor(config: &MarqueeConfig, document: Option<&Path>) -> Result<EditorState, ExitCode> {
    let state = match document {
        Some(path) => EditorState::from_document(read_document(path)?),
        None => config.new_editor(),
    };
    state.map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Write the editor's document, and its preview if asked.
pub(crate) fn write_outputs(
    config: &MarqueeConfig,
    state: &EditorState,
    output: &Path,
    png: Option<&Path>,
) -> ExitCode {
    if let Err(e) = output::save_json(&state.document(), output) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {}", output.display());

    if let Some(png) = png {
        let canvas = match config.canvas() {
            Ok(canvas) => canvas,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        };
        if let Err(e) = output::save_png(&state.render(canvas), png) {
            eprintln!("Error: Failed to write '{}': {}", png.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", png.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mrq", "render", "sign.json", "-vv", "--config", "m.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
        assert!(matches!(cli.command, Commands::Render { scale: 1, .. }));
    }

    #[test]
    fn test_scale_range() {
        assert!(Cli::try_parse_from(["mrq", "render", "a.json", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["mrq", "render", "a.json", "--scale", "17"]).is_err());
    }

    #[test]
    fn test_font_and_font_file_conflict() {
        let parsed = Cli::try_parse_from([
            "mrq", "type", "HI", "-o", "a.json", "--font", "block", "--font-file", "f.json",
        ]);
        assert!(parsed.is_err());
    }
}
