//! Document writer backends
//!
//! The builder talks to its output through [`DocumentWriter`]. The docx
//! backend produces a Word file; the collector keeps the elements in memory.

mod collector;
mod docx;

pub use collector::ElementCollector;
pub use docx::DocxWriter;

use crate::document::models::{ImageSource, StyledRun, TextAlignment};
use crate::error::Result;

pub trait DocumentWriter {
    fn add_title(&mut self, runs: Vec<StyledRun>) -> Result<()>;

    fn add_heading(&mut self, level: u8, runs: Vec<StyledRun>) -> Result<()>;

    fn add_paragraph(&mut self, runs: Vec<StyledRun>, alignment: TextAlignment) -> Result<()>;

    /// Bulleted list entry. Writers without list support emit a paragraph.
    fn add_list_item(&mut self, runs: Vec<StyledRun>) -> Result<()> {
        self.add_paragraph(runs, TextAlignment::Left)
    }

    fn add_page_break(&mut self) -> Result<()>;

    /// Add a centered image, scaled to `width_inches` when given.
    fn add_image(&mut self, image: ImageSource, width_inches: Option<f32>) -> Result<()>;
}
