//! Prints the OpenAPI document of the sample bookstore API.
//!
//! # Usage
//!
//! ```bash
//! # Pretty JSON on stdout
//! opsynth-dump
//!
//! # With a config file, written to a file
//! opsynth-dump --config opsynth.yaml --output openapi.json
//!
//! # Debug logs on stderr
//! opsynth-dump -v
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod bookstore;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use opsynth::{ApiDocs, OpSynthConfig};
use tracing_subscriber::EnvFilter;

/// Synthesize and print the bookstore OpenAPI document
#[derive(Parser, Debug)]
#[command(name = "opsynth-dump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; `OPSYNTH_*` environment variables override it
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Log registration details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(config: OpSynthConfig, compact: bool) -> anyhow::Result<String> {
    let docs = ApiDocs::new(config);
    let routes = bookstore::document(&docs).context("failed to document bookstore routes")?;
    tracing::info!(routes, "Documented bookstore API");

    let openapi = docs
        .freeze()
        .to_openapi_json()
        .context("failed to assemble OpenAPI document")?;
    let rendered = if compact {
        serde_json::to_string(&openapi)?
    } else {
        serde_json::to_string_pretty(&openapi)?
    };
    Ok(rendered)
}

fn write_output(rendered: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote OpenAPI document");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = OpSynthConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let rendered = render(config, cli.compact)?;
    write_output(&rendered, cli.output.as_deref())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_render_compact() {
        let rendered = render(OpSynthConfig::default(), true).unwrap();
        assert!(!rendered.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["openapi"], "3.0.3");
        assert!(value["paths"]["/books/{id}"]["get"].is_object());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["opsynth-dump", "-c", "opsynth.yaml", "--compact"]);
        assert_eq!(cli.config, Some(PathBuf::from("opsynth.yaml")));
        assert!(cli.compact);
        assert!(cli.output.is_none());
    }
}
