//! Replay command implementation

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use crate::config::{load_fonts, MarqueeConfig};
use crate::output::derive_output_path;
use crate::script::{parse_script, replay};

use super::{open_editor, write_outputs, EXIT_ERROR, EXIT_INVALID_ARGS};

/// Execute the replay command
pub fn run_replay(
    config: &MarqueeConfig,
    script: &Path,
    document: Option<&Path>,
    output: Option<&Path>,
    png: Option<&Path>,
) -> ExitCode {
    let file = match File::open(script) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: Cannot open '{}': {}", script.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let parsed = parse_script(file);
    if !parsed.warnings.is_empty() {
        for warning in &parsed.warnings {
            eprintln!("Error: {}:{}: {}", script.display(), warning.line, warning.message);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let fonts = match load_fonts(config) {
        Ok(fonts) => fonts,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut state = match open_editor(config, document) {
        Ok(state) => state,
        Err(code) => return code,
    };

    if let Err(e) = replay(&mut state, &parsed.commands, &fonts) {
        eprintln!("Error: {}: {}", script.display(), e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let output_path = derive_output_path(script, output, "json");
    write_outputs(config, &state, &output_path, png)
}
