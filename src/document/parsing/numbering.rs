//! Numbering management for headings and figures
//!
//! Headings get hierarchical labels ("2.0.1"); figures share one
//! document-wide counter and take their section number from the current
//! top-level heading.

pub const MAX_HEADING_LEVEL: usize = 9;

/// Caption numbering for one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureNumber {
    /// Top-level heading counter at the time the figure was inserted
    pub section: u32,
    /// Document-wide figure index, starting at 1
    pub index: u32,
}

impl std::fmt::Display for FigureNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section, self.index)
    }
}

#[derive(Debug, Default)]
pub struct NumberingEngine {
    counters: [u32; MAX_HEADING_LEVEL],
    figures: u32,
}

impl NumberingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter for `level` (1-based) and return its label.
    ///
    /// Levels outside 1..=9 are clamped into range.
    pub fn on_heading(&mut self, level: u8) -> String {
        let level_index = (level.max(1) as usize - 1).min(MAX_HEADING_LEVEL - 1);

        self.counters[level_index] += 1;

        // Reset all deeper levels
        for counter in &mut self.counters[level_index + 1..] {
            *counter = 0;
        }

        self.counters[..=level_index]
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Number of figures inserted so far
    pub fn figure_count(&self) -> u32 {
        self.figures
    }

    pub fn on_figure(&mut self) -> FigureNumber {
        self.figures += 1;
        FigureNumber {
            section: self.counters[0],
            index: self.figures,
        }
    }
}
