//! Document model building
//!
//! Walks the classified line records once, in order, and turns each into
//! calls on a [`DocumentWriter`]. Citation, heading and figure bookkeeping
//! lives in a single [`BuildState`] owned by the builder.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::front_matter::FrontMatter;
use super::models::*;
use super::parsing::classify::UncaptionedDiagramPolicy;
use super::parsing::numbering::NumberingEngine;
use super::parsing::reference::{ReferenceTable, Segment};
use super::parsing::script::split_script_runs;
use crate::config::{Config, FontTable};
use crate::error::Result;
use crate::render::{DiagramRenderer, EquationRenderer};
use crate::writer::DocumentWriter;

/// Settings the builder needs, resolved from [`Config`] and the input path.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub fonts: FontTable,
    pub image_width_inches: f32,
    pub references_title: String,
    pub uncaptioned_diagrams: UncaptionedDiagramPolicy,
    /// Directory image paths are resolved against
    pub base_dir: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), PathBuf::new())
    }
}

impl BuildOptions {
    pub fn from_config(config: &Config, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts: config.fonts.clone(),
            image_width_inches: config.document.image_width_inches,
            references_title: config.document.references_title.clone(),
            uncaptioned_diagrams: config.document.uncaptioned_diagrams,
            base_dir: base_dir.into(),
        }
    }
}

/// Mutable bookkeeping for one document pass.
#[derive(Debug)]
pub struct BuildState {
    pub references: ReferenceTable,
    pub numbering: NumberingEngine,
}

impl BuildState {
    pub fn new(references_title: &str) -> Self {
        Self {
            references: ReferenceTable::new(references_title),
            numbering: NumberingEngine::new(),
        }
    }
}

pub struct DocumentBuilder<'a, W: ?Sized, E: ?Sized, D: ?Sized> {
    writer: &'a mut W,
    equations: &'a E,
    diagrams: &'a D,
    options: &'a BuildOptions,
    state: BuildState,
}

impl<'a, W, E, D> DocumentBuilder<'a, W, E, D>
where
    W: DocumentWriter + ?Sized,
    E: EquationRenderer + ?Sized,
    D: DiagramRenderer + ?Sized,
{
    pub fn new(
        writer: &'a mut W,
        equations: &'a E,
        diagrams: &'a D,
        options: &'a BuildOptions,
    ) -> Self {
        Self {
            writer,
            equations,
            diagrams,
            options,
            state: BuildState::new(&options.references_title),
        }
    }

    /// Emit the title and author lines, when present.
    pub fn write_front_matter(&mut self, front_matter: &FrontMatter) -> Result<()> {
        if let Some(title) = front_matter.title() {
            let runs = self.runs(title, true);
            self.writer.add_title(runs)?;
        }
        if let Some(author) = front_matter.author() {
            let runs = self.runs(author, false);
            self.writer.add_paragraph(runs, TextAlignment::Left)?;
        }
        Ok(())
    }

    /// Dispatch every record, then the reference appendix, in order.
    pub fn build(mut self, records: Vec<LineRecord>) -> Result<BuildState> {
        let mut queue: VecDeque<LineRecord> = records.into();

        loop {
            while let Some(record) = queue.pop_front() {
                self.dispatch(record)?;
            }

            match self.state.references.drain() {
                Some(appendix) => queue.extend(appendix),
                None => break,
            }
        }

        Ok(self.state)
    }

    fn dispatch(&mut self, record: LineRecord) -> Result<()> {
        tracing::trace!(?record, "dispatching");

        match record {
            LineRecord::Empty => Ok(()),
            LineRecord::PageBreak => self.writer.add_page_break(),
            LineRecord::Heading { level, text } => {
                let label = self.state.numbering.on_heading(level);
                let runs = self.runs(&format!("{label}. {text}"), true);
                self.writer.add_heading(level, runs)
            }
            LineRecord::Paragraph { text } => {
                let runs = self.runs(&text, false);
                self.writer.add_paragraph(runs, TextAlignment::Left)
            }
            LineRecord::ListItem { text, .. } => {
                let runs = self.runs(&text, false);
                self.writer.add_list_item(runs)
            }
            LineRecord::ReferenceDefinition { key, text } => {
                self.state.references.register(&key, &text);
                Ok(())
            }
            LineRecord::Image { description, path } => {
                let path = self.options.base_dir.join(path);
                self.add_figure(ImageSource::Path(path), &description)
            }
            LineRecord::Diagram { content, caption } => {
                let bytes = self.diagrams.render_diagram(&DiagramSource {
                    content,
                    caption: caption.clone(),
                })?;
                self.add_figure(ImageSource::Bytes(bytes), &caption)
            }
            LineRecord::Equation { latex } => {
                let bytes = self.equations.render_equation(&latex)?;
                self.writer.add_image(ImageSource::Bytes(bytes), None)
            }
        }
    }

    fn add_figure(&mut self, source: ImageSource, description: &str) -> Result<()> {
        let number = self.state.numbering.on_figure();
        self.writer
            .add_image(source, Some(self.options.image_width_inches))?;

        let caption = format!("Figure {number}. {description}");
        let runs = self.runs(&caption, false);
        self.writer.add_paragraph(runs, TextAlignment::Center)
    }

    /// Resolve citations in `text`, then split it into font-tagged runs.
    fn runs(&self, text: &str, heading: bool) -> Vec<StyledRun> {
        let fonts = &self.options.fonts;
        let mut runs = Vec::new();

        for segment in self.state.references.scan_and_replace(text) {
            let (content, superscript) = match segment {
                Segment::Text(content) => (content.to_string(), false),
                Segment::Citation(index) => (format!("[{index}]"), true),
            };

            runs.extend(split_script_runs(&content).into_iter().map(|run| StyledRun {
                text: run.content.to_string(),
                font_family: fonts.select(run.region, heading).to_string(),
                superscript,
            }));
        }

        StyledRun::consolidate_runs(runs)
    }
}

/// Resolve the directory that relative image paths in `input` refer to.
pub(crate) fn base_dir_of(input: &Path) -> PathBuf {
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
