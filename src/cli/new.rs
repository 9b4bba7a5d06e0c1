//! New command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::MarqueeConfig;

use super::{write_outputs, EXIT_INVALID_ARGS};

/// Execute the new command
pub fn run_new(config: &MarqueeConfig, output: &Path, width: Option<u32>, height: Option<u32>) -> ExitCode {
    let mut config = config.clone();
    if let Some(width) = width {
        config.grid.width = width;
    }
    if let Some(height) = height {
        config.grid.height = height;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("Error: {}", error);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    match config.new_editor() {
        Ok(state) => write_outputs(&config, &state, output, None),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
    }
}
