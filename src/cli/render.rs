//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use log::info;

use crate::config::MarqueeConfig;
use crate::output::{derive_output_path, save_png, scale_image};
use crate::tool::EditorState;

use super::{read_document, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(config: &MarqueeConfig, input: &Path, output: Option<&Path>, scale: u8) -> ExitCode {
    let document = match read_document(input) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let canvas = match config.canvas() {
        Ok(canvas) => canvas,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let state = match EditorState::from_document(document) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let image = scale_image(state.render(canvas), scale);
    info!("rendered {}x{} preview", image.width(), image.height());

    let output_path = derive_output_path(input, output, "png");
    if let Err(e) = save_png(&image, &output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", output_path.display());
    ExitCode::from(EXIT_SUCCESS)
}
