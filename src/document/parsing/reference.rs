//! Footnote-style citation tracking
//!
//! Definitions (`[^key]: text`) register a referenced text; inline markers
//! (`[^key]`) resolve to the text's sequential index. Texts are numbered in
//! the order they are first defined, so several keys pointing at the same
//! text share one index.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::models::LineRecord;

static CITATION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^([^\[\]]+)\]").unwrap());

pub(crate) const DEFAULT_APPENDIX_TITLE: &str = "References";

/// A piece of text after citation markers have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, including any marker that did not resolve
    Text(&'a str),
    /// A resolved marker, rendered as a superscript `[index]`
    Citation(usize),
}

#[derive(Debug)]
pub struct ReferenceTable {
    /// citation key -> referenced text; later definitions win
    texts_by_key: HashMap<String, String>,
    /// referenced text -> index, assigned once
    index_by_text: HashMap<String, usize>,
    /// texts registered since the last drain, in first-seen order
    pending: Vec<String>,
    appendix_title: String,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::new(DEFAULT_APPENDIX_TITLE)
    }
}

impl ReferenceTable {
    pub fn new(appendix_title: impl Into<String>) -> Self {
        Self {
            texts_by_key: HashMap::new(),
            index_by_text: HashMap::new(),
            pending: Vec::new(),
            appendix_title: appendix_title.into(),
        }
    }

    pub fn register(&mut self, key: &str, text: &str) {
        self.texts_by_key.insert(key.to_string(), text.to_string());

        if !self.index_by_text.contains_key(text) {
            let index = self.index_by_text.len() + 1;
            self.index_by_text.insert(text.to_string(), index);
            self.pending.push(text.to_string());
        }
    }

    pub fn resolve(&self, key: &str) -> Option<usize> {
        let text = self.texts_by_key.get(key)?;
        self.index_by_text.get(text).copied()
    }

    /// Split `text` into literal segments and resolved citations.
    pub fn scan_and_replace<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut literal_start = 0;

        for captures in CITATION_MARKER.captures_iter(text) {
            let (Some(marker), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let Some(index) = self.resolve(key.as_str()) else {
                tracing::debug!(key = key.as_str(), "leaving unresolved citation as text");
                continue;
            };

            if marker.start() > literal_start {
                segments.push(Segment::Text(&text[literal_start..marker.start()]));
            }
            segments.push(Segment::Citation(index));
            literal_start = marker.end();
        }

        if literal_start < text.len() {
            segments.push(Segment::Text(&text[literal_start..]));
        }

        segments
    }

    /// Take the reference appendix for texts registered since the last call.
    pub fn drain(&mut self) -> Option<Vec<LineRecord>> {
        if self.pending.is_empty() {
            return None;
        }

        let mut records = Vec::with_capacity(self.pending.len() + 1);
        records.push(LineRecord::Heading {
            level: 1,
            text: self.appendix_title.clone(),
        });

        for text in std::mem::take(&mut self.pending) {
            let index = self.index_by_text[&text];
            records.push(LineRecord::Paragraph {
                text: format!("[{index}]: {text}"),
            });
        }

        Some(records)
    }
}
