//! mdocx: Markdown to Word converter
//!
//! This library classifies the lines of a Markdown document, numbers its
//! headings and figures, resolves footnote-style citations and writes the
//! result through a pluggable document writer, .docx by default.

pub mod config;
pub mod document;
pub mod error;
pub mod render;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use document::{
    build_document, convert_file, BuildOptions, DocumentElement, FrontMatter, LineRecord,
};
pub use error::{Error, Result};
pub use render::{DiagramRenderer, EquationRenderer, LatexRenderer, MermaidRenderer};
pub use writer::{DocumentWriter, DocxWriter, ElementCollector};
