use std::fs;
use std::process::Command;

use super::{read_output, run_tool, EquationRenderer};
use crate::config::LatexConfig;
use crate::error::Result;

const RENDERER: &str = "equation";

/// Renders equations with `latex` followed by `dvipng`.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    config: LatexConfig,
}

impl LatexRenderer {
    pub fn new(config: LatexConfig) -> Self {
        Self { config }
    }

    fn source_document(&self, latex: &str) -> String {
        format!(
            "\\documentclass[varwidth,{size}pt]{{standalone}}\n\
             \\usepackage{{amsmath,amsfonts,amssymb}}\n\
             \\pagestyle{{empty}}\n\
             \\begin{{document}}\n\
             {latex}\n\
             \\end{{document}}\n",
            size = self.config.font_size,
        )
    }
}

impl EquationRenderer for LatexRenderer {
    fn render_equation(&self, latex: &str) -> Result<Vec<u8>> {
        let workdir = tempfile::Builder::new().prefix("mdocx-latex").tempdir()?;
        let tex_path = workdir.path().join("equation.tex");
        let dvi_path = workdir.path().join("equation.dvi");
        let png_path = workdir.path().join("equation.png");

        fs::write(&tex_path, self.source_document(latex))?;

        let mut compile = Command::new(&self.config.latex);
        compile
            .current_dir(workdir.path())
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(&tex_path);
        run_tool(RENDERER, compile)?;

        let mut rasterize = Command::new(&self.config.dvipng);
        rasterize
            .current_dir(workdir.path())
            .args(["-T", "tight", "-z", "9", "--truecolor", "-D"])
            .arg(self.config.dpi.to_string())
            .arg("-o")
            .arg(&png_path)
            .arg(&dvi_path);
        run_tool(RENDERER, rasterize)?;

        let bytes = read_output(RENDERER, &png_path)?;
        workdir.close()?;
        Ok(bytes)
    }
}
