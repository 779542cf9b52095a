//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::editor::TextBuffer;

#[derive(Debug, Parser)]
#[command(name = "duckpad")]
#[command(about = "Terminal writing pad that asks questions about your draft")]
#[command(version)]
pub struct Cli {
    /// Text file loaded as the initial document
    pub file: Option<PathBuf>,
}

impl Cli {
    /// Reads `file` into a buffer, or returns an empty one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file cannot be read as UTF-8 text.
    pub fn initial_buffer(&self) -> std::io::Result<TextBuffer> {
        match &self.file {
            Some(path) => read_buffer(path),
            None => Ok(TextBuffer::default()),
        }
    }
}

fn read_buffer(path: &Path) -> std::io::Result<TextBuffer> {
    let text = std::fs::read_to_string(path)?;
    Ok(TextBuffer::from_text(&text))
}
