use super::DocumentWriter;
use crate::document::models::{DocumentElement, ImageSource, StyledRun, TextAlignment};
use crate::error::Result;

/// Writer that keeps the emitted elements as an in-memory document model.
#[derive(Debug, Default)]
pub struct ElementCollector {
    pub elements: Vec<DocumentElement>,
}

impl ElementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_elements(self) -> Vec<DocumentElement> {
        self.elements
    }
}

impl DocumentWriter for ElementCollector {
    fn add_title(&mut self, runs: Vec<StyledRun>) -> Result<()> {
        self.elements.push(DocumentElement::Title { runs });
        Ok(())
    }

    fn add_heading(&mut self, level: u8, runs: Vec<StyledRun>) -> Result<()> {
        self.elements.push(DocumentElement::Heading { level, runs });
        Ok(())
    }

    fn add_paragraph(&mut self, runs: Vec<StyledRun>, alignment: TextAlignment) -> Result<()> {
        self.elements
            .push(DocumentElement::Paragraph { runs, alignment });
        Ok(())
    }

    fn add_list_item(&mut self, runs: Vec<StyledRun>) -> Result<()> {
        self.elements.push(DocumentElement::ListItem { runs });
        Ok(())
    }

    fn add_page_break(&mut self) -> Result<()> {
        self.elements.push(DocumentElement::PageBreak);
        Ok(())
    }

    fn add_image(&mut self, source: ImageSource, width_inches: Option<f32>) -> Result<()> {
        self.elements.push(DocumentElement::Image {
            source,
            width_inches,
        });
        Ok(())
    }
}
