//! Markdown document parsing and model building
//!
//! This module turns Markdown text into line records and drives a
//! [`DocumentWriter`](crate::writer::DocumentWriter) with them.

pub mod builder;
pub mod front_matter;
pub mod loader;
pub mod models;
pub mod parsing;

// Re-export all models and the loading entry points
pub use builder::{BuildOptions, BuildState, DocumentBuilder};
pub use front_matter::{extract_front_matter, FrontMatter};
pub use loader::{build_document, convert_file, default_output_path, load_elements, read_input};
pub use models::*;
