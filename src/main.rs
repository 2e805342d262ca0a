use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mdocx::document::{default_output_path, load_elements};
use mdocx::{convert_file, Config};

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(about = "Convert Markdown documents to Word (.docx)")]
#[command(version)]
struct Cli {
    /// Markdown file to convert
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (defaults to the input path with a .docx extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the mdocx config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the document model as JSON instead of writing a .docx
    #[arg(long)]
    dump_json: bool,

    /// Log each processing step
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.dump_json {
        let (front_matter, elements) = load_elements(&cli.input, &config)
            .with_context(|| format!("Failed to convert {}", cli.input.display()))?;
        let json = serde_json::json!({
            "front_matter": front_matter,
            "elements": elements,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));

    convert_file(&cli.input, &output, &config)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    println!("Wrote {}", output.display());
    Ok(())
}
