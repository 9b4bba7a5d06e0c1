//! Export-glyphs command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::codec::export_stack;
use crate::output::{derive_output_path, save_json};

use super::{read_document, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the export-glyphs command
pub fn run_export_glyphs(input: &Path, output: Option<&Path>) -> ExitCode {
    let document = match read_document(input) {
        Ok(document) => document,
        Err(code) => return code,
    };

    let font = export_stack(&document.layers);
    if font.is_empty() {
        eprintln!("Warning: '{}' has no user layers to export", input.display());
    }

    let output_path = derive_output_path(input, output, "glyphs.json");
    if let Err(e) = save_json(&font, &output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({} glyph(s))", output_path.display(), font.len());
    ExitCode::from(EXIT_SUCCESS)
}
