use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;

use super::{read_output, run_tool, DiagramRenderer};
use crate::config::MermaidConfig;
use crate::document::models::DiagramSource;
use crate::error::Result;

const RENDERER: &str = "mermaid";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PuppeteerConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    executable_path: Option<&'a PathBuf>,
    args: &'a [String],
}

/// Renders mermaid diagrams with mermaid-cli (`mmdc`).
#[derive(Debug, Clone)]
pub struct MermaidRenderer {
    config: MermaidConfig,
}

impl MermaidRenderer {
    pub fn new(config: MermaidConfig) -> Self {
        Self { config }
    }
}

impl DiagramRenderer for MermaidRenderer {
    fn render_diagram(&self, diagram: &DiagramSource) -> Result<Vec<u8>> {
        // Dropping the directory removes every file below, also on early return
        let workdir = tempfile::Builder::new().prefix("mdocx-mermaid").tempdir()?;

        let source_path = workdir.path().join("diagram.mmd");
        let puppeteer_path = workdir.path().join("puppeteer-config.json");
        let stylesheet_path = workdir.path().join("mermaid.css");
        let output_path = workdir.path().join("diagram.png");

        fs::write(&source_path, &diagram.content)?;
        let puppeteer = PuppeteerConfig {
            executable_path: self.config.chrome_path.as_ref(),
            args: &self.config.puppeteer_args,
        };
        fs::write(
            &puppeteer_path,
            serde_json::to_vec(&puppeteer).map_err(std::io::Error::other)?,
        )?;
        fs::write(&stylesheet_path, &self.config.stylesheet)?;

        let mut command = Command::new(&self.config.executable);
        command
            .arg("-i")
            .arg(&source_path)
            .arg("-o")
            .arg(&output_path)
            .arg("-p")
            .arg(&puppeteer_path)
            .arg("-C")
            .arg(&stylesheet_path)
            .arg("-H")
            .arg(self.config.height.to_string());

        tracing::debug!(caption = %diagram.caption, "rendering diagram");
        run_tool(RENDERER, command)?;
        let bytes = read_output(RENDERER, &output_path)?;

        workdir.close()?;
        Ok(bytes)
    }
}
