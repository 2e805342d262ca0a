//! Error types for the conversion pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a conversion.
///
/// Unresolved citation markers and dropped fenced blocks are not errors: the
/// former stay in the output as literal text, the latter are logged.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document does not exist or cannot be read.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The leading metadata block is unterminated or is not a flat YAML mapping.
    #[error("Front matter could not be parsed: {0}")]
    FrontMatterUnparsable(String),

    /// A `mermaid` fence without a caption, when such blocks are rejected.
    #[error("Diagram block at line {line} has no [caption]")]
    MalformedDiagramBlock { line: usize },

    /// The equation or diagram renderer failed to produce an image.
    #[error("{renderer} renderer failed: {message}")]
    RendererFailure {
        renderer: &'static str,
        message: String,
    },

    /// An image referenced by the document does not exist.
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// Raster data that could not be decoded.
    #[error("Image decoding error: {0}")]
    Image(String),

    /// Failure while packing the output document.
    #[error("Failed to write document: {0}")]
    Write(String),

    /// Malformed configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn renderer(renderer: &'static str, message: impl Into<String>) -> Self {
        Error::RendererFailure {
            renderer,
            message: message.into(),
        }
    }
}
