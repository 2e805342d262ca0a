//! Core data structures for document representation
//!
//! This module defines the line records produced by the classifier and the
//! element model produced by the builder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One logical line of the source document.
///
/// Multi-line constructs (equation and diagram blocks) collapse into a single
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRecord {
    Empty,
    PageBreak,
    Equation {
        /// LaTeX source, wrapped in `$$` delimiters
        latex: String,
    },
    Diagram {
        content: String,
        caption: String,
    },
    ListItem {
        marker: char,
        text: String,
    },
    Heading {
        level: u8,
        text: String,
    },
    ReferenceDefinition {
        key: String,
        text: String,
    },
    Image {
        description: String,
        path: String,
    },
    Paragraph {
        text: String,
    },
}

/// Script category of a run of text, used for font selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptRegion {
    /// Kana, Han and the fullwidth punctuation that goes with them
    Wide,
    /// Everything else, digits and ASCII punctuation included
    Other,
}

/// A run of text handed to the document writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub superscript: bool,
}

impl StyledRun {
    /// Consolidate adjacent runs with identical styling into single runs
    pub fn consolidate_runs(runs: Vec<StyledRun>) -> Vec<StyledRun> {
        let mut consolidated: Vec<StyledRun> = Vec::with_capacity(runs.len());

        for run in runs {
            match consolidated.last_mut() {
                Some(current)
                    if current.font_family == run.font_family
                        && current.superscript == run.superscript =>
                {
                    current.text.push_str(&run.text);
                }
                _ => consolidated.push(run),
            }
        }

        consolidated
    }

    /// Plain text of a sequence of runs
    pub fn text_of(runs: &[StyledRun]) -> String {
        runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
}

/// Where the bytes of an image come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImageSource {
    Path(PathBuf),
    /// Rendered raster; serialized as its byte length
    Bytes(#[serde(serialize_with = "serialize_byte_len")] Vec<u8>),
}

fn serialize_byte_len<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}

/// Input handed to a diagram renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    pub content: String,
    pub caption: String,
}

/// A document element as emitted by the builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DocumentElement {
    Title {
        runs: Vec<StyledRun>,
    },
    Heading {
        level: u8,
        runs: Vec<StyledRun>,
    },
    Paragraph {
        runs: Vec<StyledRun>,
        alignment: TextAlignment,
    },
    ListItem {
        runs: Vec<StyledRun>,
    },
    Image {
        source: ImageSource,
        width_inches: Option<f32>,
    },
    PageBreak,
}

impl DocumentElement {
    /// Text content of the element; empty for images and page breaks
    pub fn text(&self) -> String {
        match self {
            DocumentElement::Title { runs }
            | DocumentElement::Heading { runs, .. }
            | DocumentElement::Paragraph { runs, .. }
            | DocumentElement::ListItem { runs } => StyledRun::text_of(runs),
            DocumentElement::Image { .. } | DocumentElement::PageBreak => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, font: &str, superscript: bool) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            font_family: font.to_string(),
            superscript,
        }
    }

    #[test]
    fn test_consolidate_merges_matching_neighbours() {
        let runs = vec![
            run("Hello ", "Times", false),
            run("world", "Times", false),
            run("[1]", "Times", true),
            run("漢字", "Mincho", false),
        ];

        let merged = StyledRun::consolidate_runs(runs);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].text, "Hello world");
        assert!(merged[1].superscript);
        assert_eq!(merged[2].font_family, "Mincho");
    }

    #[test]
    fn test_element_text() {
        let heading = DocumentElement::Heading {
            level: 1,
            runs: vec![run("1. ", "Arial", false), run("概要", "Gothic", false)],
        };
        assert_eq!(heading.text(), "1. 概要");
        assert_eq!(DocumentElement::PageBreak.text(), "");
    }
}
