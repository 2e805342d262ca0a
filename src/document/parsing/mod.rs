//! Document parsing utilities
//!
//! Line classification plus the per-text helpers the builder applies to
//! every paragraph: citation resolution, script splitting and numbering.

pub mod classify;
pub mod numbering;
pub mod reference;
pub mod script;

pub use classify::{classify_lines, classify_lines_with, UncaptionedDiagramPolicy};
pub use numbering::{FigureNumber, NumberingEngine};
pub use reference::{ReferenceTable, Segment};
pub use script::{split_script_runs, ScriptRun};
