//! # Command Output
//!
//! Every command produces both renderings; `--json` picks which one is
//! printed.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Rendered result of a command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Human-readable text.
    pub text: String,
    /// Machine-readable value.
    pub json: Value,
}

impl CommandOutput {
    /// Builds an output from text and any serializable value.
    pub fn new<T: Serialize + ?Sized>(text: impl Into<String>, value: &T) -> Result<Self, ApiError> {
        Ok(CommandOutput {
            text: text.into(),
            json: serde_json::to_value(value)?,
        })
    }

    /// Output with a plain message in both renderings.
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        CommandOutput {
            json: serde_json::json!({ "message": text }),
            text,
        }
    }

    /// The string to print for the chosen mode.
    pub fn render(&self, json: bool) -> Result<String, ApiError> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Left-pads a column to `width` characters.
pub(crate) fn pad_left(value: &str, width: usize) -> String {
    format!("{:>width$}", value, width = width)
}

/// Right-pads a column to `width` characters, truncating longer values.
pub(crate) fn pad_right(value: &str, width: usize) -> String {
    let clipped: String = value.chars().take(width).collect();
    format!("{:<width$}", clipped, width = width)
}
