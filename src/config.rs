use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::models::ScriptRegion;
use crate::document::parsing::classify::UncaptionedDiagramPolicy;
use crate::document::parsing::reference::DEFAULT_APPENDIX_TITLE;
use crate::error::{Error, Result};

/// Configuration for mdocx
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fonts: FontTable,
    pub document: DocumentConfig,
    pub mermaid: MermaidConfig,
    pub latex: LatexConfig,
}

/// Font family per script region and paragraph kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontTable {
    pub wide_heading: String,
    pub wide_body: String,
    pub other_heading: String,
    pub other_body: String,
}

impl Default for FontTable {
    fn default() -> Self {
        FontTable {
            wide_heading: "ＭＳ ゴシック".to_string(),
            wide_body: "ＭＳ 明朝".to_string(),
            other_heading: "Arial".to_string(),
            other_body: "Times New Roman".to_string(),
        }
    }
}

impl FontTable {
    pub fn select(&self, region: ScriptRegion, heading: bool) -> &str {
        match (region, heading) {
            (ScriptRegion::Wide, true) => self.wide_heading.as_str(),
            (ScriptRegion::Wide, false) => self.wide_body.as_str(),
            (ScriptRegion::Other, true) => self.other_heading.as_str(),
            (ScriptRegion::Other, false) => self.other_body.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Width of images and diagrams in the output, in inches
    pub image_width_inches: f32,
    /// Heading of the generated reference list
    pub references_title: String,
    pub uncaptioned_diagrams: UncaptionedDiagramPolicy,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            image_width_inches: 5.0,
            references_title: DEFAULT_APPENDIX_TITLE.to_string(),
            uncaptioned_diagrams: UncaptionedDiagramPolicy::default(),
        }
    }
}

/// Settings for the mermaid-cli (`mmdc`) diagram renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MermaidConfig {
    pub executable: PathBuf,
    /// Browser used by puppeteer; puppeteer's bundled one when unset
    pub chrome_path: Option<PathBuf>,
    pub puppeteer_args: Vec<String>,
    /// Output height in pixels
    pub height: u32,
    pub stylesheet: String,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        MermaidConfig {
            executable: PathBuf::from("mmdc"),
            chrome_path: None,
            puppeteer_args: Vec::new(),
            height: 1200,
            stylesheet: DEFAULT_MERMAID_CSS.to_string(),
        }
    }
}

const DEFAULT_MERMAID_CSS: &str = "\
.mermaid {
    height: 60% !important;
}
.label {
    font-size: 10.5px !important;
}
";

/// Settings for the LaTeX + dvipng equation renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatexConfig {
    pub latex: PathBuf,
    pub dvipng: PathBuf,
    /// Document font size in points
    pub font_size: u32,
    pub dpi: u32,
}

impl Default for LatexConfig {
    fn default() -> Self {
        LatexConfig {
            latex: PathBuf::from("latex"),
            dvipng: PathBuf::from("dvipng"),
            font_size: 11,
            dpi: 300,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from the config
    /// directory when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::get_config_path() {
                Some(config_path) if config_path.exists() => Self::from_file(&config_path),
                // Return default config if no file found
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Get the path to the user config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mdocx").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.document.image_width_inches, 5.0);
        assert_eq!(config.document.references_title, "References");
        assert_eq!(config.mermaid.height, 1200);
        assert_eq!(config.latex.font_size, 11);
        assert_eq!(config.fonts.select(ScriptRegion::Other, true), "Arial");
        assert_eq!(config.fonts.select(ScriptRegion::Wide, false), "ＭＳ 明朝");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[document]
references_title = "参考文献"
uncaptioned_diagrams = "reject"

[mermaid]
chrome_path = "/usr/bin/chromium"
puppeteer_args = ["--no-sandbox"]
"#,
        )
        .unwrap();

        assert_eq!(config.document.references_title, "参考文献");
        assert_eq!(
            config.document.uncaptioned_diagrams,
            UncaptionedDiagramPolicy::Reject
        );
        assert_eq!(config.document.image_width_inches, 5.0);
        assert_eq!(
            config.mermaid.chrome_path.as_deref(),
            Some(Path::new("/usr/bin/chromium"))
        );
        assert_eq!(config.mermaid.puppeteer_args, vec!["--no-sandbox"]);
        assert_eq!(config.mermaid.executable, PathBuf::from("mmdc"));
        assert_eq!(config.fonts.other_body, "Times New Roman");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = Config::from_toml("[document]\nimage_width_inches = \"wide\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let err = Config::load(Some(Path::new("/nonexistent/mdocx.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
