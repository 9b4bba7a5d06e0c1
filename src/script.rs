//! Scripted editor sessions
//!
//! A script is a stream of JSON5 command objects, one per line or spread over
//! several lines, replayed against an [`EditorState`]:
//!
//! ```text
//! {"op": "mode", "mode": "draw"}
//! {"op": "tool", "tool": "pen"}
//! {"op": "color", "color": 2}
//! {"op": "down", "x": 60, "y": 60}
//! {"op": "move", "x": 84, "y": 60}
//! {"op": "up", "x": 84, "y": 60}
//! {"op": "text", "text": "HELLO", "font": "albers"}
//! ```
//!
//! Pointer coordinates are canvas pixels, as a UI would deliver them.

use crate::cell::Shape;
use crate::error::EditorError;
use crate::glyph::Font;
use crate::tool::{EditorState, Mode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use thiserror::Error;

/// One editor command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Command {
    Mode { mode: Mode },
    Tool { tool: Shape },
    Color { color: usize },
    /// Hold or release the extend modifier
    Modifier { held: bool },
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up { x: i32, y: i32 },
    /// Typeset text; without `font` the first loaded font is used
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
    },
    /// Drop the topmost user layer
    Pop,
    Visible { layer: usize, visible: bool },
    Remove { layer: usize },
}

/// A command with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// A parse problem; parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// Result of parsing a script stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub commands: Vec<ScriptLine>,
    pub warnings: Vec<Warning>,
}

/// Error raised while replaying a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown font '{name}'")]
    UnknownFont { line: usize, name: String },
    #[error("line {line}: no font loaded for text command")]
    NoFont { line: usize },
    #[error("line {line}: {source}")]
    Editor {
        line: usize,
        #[source]
        source: EditorError,
    },
}

/// Parse a single JSON5 command.
pub fn parse_command(text: &str, line: usize) -> Result<ScriptLine, Warning> {
    json5::from_str(text)
        .map(|command| ScriptLine { line, command })
        .map_err(|e| Warning { message: e.to_string(), line })
}

/// Parse a stream of JSON5 command objects.
///
/// Objects may span lines; brace and bracket depth outside strings decides
/// where one ends. Parsing stops at the first malformed object, since the
/// next object boundary can no longer be trusted.
pub fn parse_script<R: Read>(reader: R) -> ParseResult {
    use std::io::BufRead;

    let mut result = ParseResult::default();
    let mut accumulator = String::new();
    let mut start_line = 1;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (index, line) in std::io::BufReader::new(reader).lines().enumerate() {
        let current_line = index + 1;
        let Ok(line) = line else {
            result.warnings.push(Warning { message: "unreadable line".to_string(), line: current_line });
            return result;
        };

        if accumulator.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            start_line = current_line;
        } else {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);

        for ch in line.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }
            match ch {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' | '[' if !in_string => depth += 1,
                '}' | ']' if !in_string => depth -= 1,
                _ => {}
            }
        }

        if depth == 0 {
            match parse_command(&accumulator, start_line) {
                Ok(command) => result.commands.push(command),
                Err(warning) => {
                    result.warnings.push(warning);
                    return result;
                }
            }
            accumulator.clear();
            in_string = false;
            escape_next = false;
        }
    }

    if !accumulator.trim().is_empty() {
        match parse_command(&accumulator, start_line) {
            Ok(command) => result.commands.push(command),
            Err(warning) => result.warnings.push(warning),
        }
    }

    result
}

/// Fonts available to `text` commands, by name.
pub type FontSet = BTreeMap<String, Font>;

/// Apply one command to the editor.
pub fn apply(state: &mut EditorState, step: &ScriptLine, fonts: &FontSet) -> Result<(), ScriptError> {
    let line = step.line;
    let editor = |source: EditorError| ScriptError::Editor { line, source };

    match &step.command {
        Command::Mode { mode } => state.set_mode(*mode),
        Command::Tool { tool } => state.set_tool(*tool),
        Command::Color { color } => state.set_color(*color).map_err(editor)?,
        Command::Modifier { held } => state.set_extend_modifier(*held),
        Command::Down { x, y } => state.on_pointer_down(*x, *y),
        Command::Move { x, y } => state.on_pointer_move(*x, *y),
        Command::Up { x, y } => state.on_pointer_up(*x, *y),
        Command::Text { text, font } => {
            let font = match font {
                Some(name) => fonts
                    .get(name)
                    .ok_or_else(|| ScriptError::UnknownFont { line, name: name.clone() })?,
                None => fonts.values().next().ok_or(ScriptError::NoFont { line })?,
            };
            state.on_submit_text(font, text);
        }
        Command::Pop => {
            if state.pop_layer().is_none() {
                warn!("line {}: nothing to pop", line);
            }
        }
        Command::Visible { layer, visible } => {
            state.set_layer_visible(*layer, *visible).map_err(editor)?
        }
        Command::Remove { layer } => {
            state.remove_layer(*layer).map_err(editor)?;
        }
    }
    Ok(())
}

/// Replay every command in order, stopping at the first failure.
pub fn replay(state: &mut EditorState, script: &[ScriptLine], fonts: &FontSet) -> Result<(), ScriptError> {
    for step in script {
        apply(state, step, fonts)?;
    }
    debug!("replayed {} command(s)", script.len());
    Ok(())
}
