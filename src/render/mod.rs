//! Raster renderers for equations and diagrams
//!
//! Both renderers shell out to external tools and work inside a temporary
//! directory that is removed when the render returns, whether it succeeded
//! or not.

mod latex;
mod mermaid;

pub use latex::LatexRenderer;
pub use mermaid::MermaidRenderer;

use std::path::Path;
use std::process::Command;

use crate::document::models::DiagramSource;
use crate::error::{Error, Result};

pub trait EquationRenderer {
    /// Render LaTeX source (including its `$$` delimiters) to PNG bytes.
    fn render_equation(&self, latex: &str) -> Result<Vec<u8>>;
}

pub trait DiagramRenderer {
    /// Render diagram source to PNG bytes.
    fn render_diagram(&self, diagram: &DiagramSource) -> Result<Vec<u8>>;
}

/// Run `command`, turning spawn failures and nonzero exits into
/// [`Error::RendererFailure`].
fn run_tool(renderer: &'static str, mut command: Command) -> Result<()> {
    tracing::debug!(renderer, command = ?command, "running renderer");

    let output = command.output().map_err(|e| {
        Error::renderer(
            renderer,
            format!("failed to start {}: {e}", command.get_program().to_string_lossy()),
        )
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        return Err(Error::renderer(
            renderer,
            format!("{} ({detail})", output.status),
        ));
    }

    Ok(())
}

fn read_output(renderer: &'static str, path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        Error::renderer(
            renderer,
            format!("no output at {}: {e}", path.display()),
        )
    })
}
