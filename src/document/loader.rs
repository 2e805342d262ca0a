//! Document loading and orchestration
//!
//! Ties the stages together: front matter extraction, line classification
//! and model building, feeding a writer.

use std::fs;
use std::path::{Path, PathBuf};

use super::builder::{base_dir_of, BuildOptions, BuildState, DocumentBuilder};
use super::front_matter::{extract_front_matter, FrontMatter};
use super::models::DocumentElement;
use super::parsing::classify::classify_lines_with;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::render::{DiagramRenderer, EquationRenderer, LatexRenderer, MermaidRenderer};
use crate::writer::{DocumentWriter, DocxWriter, ElementCollector};

/// Run the whole pipeline over `markdown`, emitting into `writer`.
///
/// Returns the front matter and the final build state.
pub fn build_document<W, E, D>(
    markdown: &str,
    options: &BuildOptions,
    writer: &mut W,
    equations: &E,
    diagrams: &D,
) -> Result<(FrontMatter, BuildState)>
where
    W: DocumentWriter + ?Sized,
    E: EquationRenderer + ?Sized,
    D: DiagramRenderer + ?Sized,
{
    let lines: Vec<&str> = markdown.lines().collect();

    let (front_matter, body_start) = extract_front_matter(&lines)?;
    let records = classify_lines_with(
        &lines[body_start..],
        body_start + 1,
        options.uncaptioned_diagrams,
    )?;
    tracing::debug!(
        metadata = front_matter.len(),
        records = records.len(),
        "classified document"
    );

    let mut builder = DocumentBuilder::new(writer, equations, diagrams, options);
    builder.write_front_matter(&front_matter)?;
    let state = builder.build(records)?;

    Ok((front_matter, state))
}

/// Read a Markdown file as UTF-8.
pub fn read_input(input: &Path) -> Result<String> {
    fs::read_to_string(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::InputNotFound(input.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Output path used when none is given: the input with a `.docx` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

/// Convert a Markdown file to a .docx file.
///
/// Nothing is written unless every stage succeeds.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let markdown = read_input(input)?;
    let options = BuildOptions::from_config(config, base_dir_of(input));

    let mut writer = DocxWriter::new(config.fonts.other_body.clone());
    let equations = LatexRenderer::new(config.latex.clone());
    let diagrams = MermaidRenderer::new(config.mermaid.clone());

    let (_, state) = build_document(&markdown, &options, &mut writer, &equations, &diagrams)?;
    tracing::debug!(
        paragraphs = writer.paragraph_count(),
        figures = state.numbering.figure_count(),
        "built document"
    );

    writer.save(output)
}

/// Build the in-memory element model of a Markdown file.
pub fn load_elements(input: &Path, config: &Config) -> Result<(FrontMatter, Vec<DocumentElement>)> {
    let markdown = read_input(input)?;
    let options = BuildOptions::from_config(config, base_dir_of(input));

    let mut collector = ElementCollector::new();
    let equations = LatexRenderer::new(config.latex.clone());
    let diagrams = MermaidRenderer::new(config.mermaid.clone());

    let (front_matter, _) =
        build_document(&markdown, &options, &mut collector, &equations, &diagrams)?;
    Ok((front_matter, collector.into_elements()))
}
