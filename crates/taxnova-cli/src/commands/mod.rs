//! CLI subcommands.

pub mod ask;
pub mod chat;
pub mod config;
pub mod display;
pub mod estimate;
pub mod extract;
pub mod filing;
pub mod resources;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use taxnova_core::form16::{ExtractionResult, Form16Parser};
use taxnova_core::models::config::TaxnovaConfig;
use taxnova_core::pdf::PdfExtractor;
use taxnova_core::TaxDuePolicy;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// How tax due is reported when withheld tax exceeds liability.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    /// Never below zero
    Floored,
    /// Negative means refund due
    Signed,
}

impl From<PolicyArg> for TaxDuePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Floored => TaxDuePolicy::Floored,
            PolicyArg::Signed => TaxDuePolicy::Signed,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taxnova")
        .join("config.json")
}

/// Load `--config` if given, else the default config file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TaxnovaConfig> {
    if let Some(path) = config_path {
        return Ok(TaxnovaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(TaxnovaConfig::from_file(&default_path)?)
    } else {
        Ok(TaxnovaConfig::default())
    }
}

pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Read a Form 16 PDF and extract its figures.
///
/// Unreadable pages are skipped; a document without any text yields zeroes.
pub fn read_certificate(path: &Path) -> anyhow::Result<ExtractionResult> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    info!("Processing file: {}", path.display());
    let pb = spinner("Reading PDF...")?;

    let data = fs::read(path)?;
    let content = match PdfExtractor::from_bytes(&data) {
        Ok(content) => content,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    if !content.skipped_pages.is_empty() {
        debug!("Skipped pages without text: {:?}", content.skipped_pages);
    }
    if content.is_empty() {
        warn!("No text could be extracted from {}; all fields default to 0", path.display());
    }

    pb.set_message("Extracting fields...");
    let result = Form16Parser::new().parse(&content.text);
    for warning in &result.warnings {
        debug!("{}", warning);
    }

    pb.finish_and_clear();
    Ok(result)
}
