//! File command - simulated return filing.

use std::path::PathBuf;

use clap::Args;

use taxnova_core::{ReturnFiler, SimulatedFiler};

use super::display::{receipt_text, Palette};
use super::{load_config, read_certificate, OutputFormat};

/// Arguments for the file command.
#[derive(Args)]
pub struct FileArgs {
    /// Form 16 PDF to auto-fill the return from
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: FileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let result = read_certificate(&args.input)?;

    let receipt = SimulatedFiler::new(config.filing.clone()).file(&result.financials);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["status", "message", "reference_id", "simulated"])?;
            wtr.write_record([
                receipt.status.as_str(),
                receipt.message.as_str(),
                receipt.reference_id.as_str(),
                if receipt.simulated { "true" } else { "false" },
            ])?;
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => print!("{}", receipt_text(&receipt, &Palette::for_theme(config.ui.theme))),
    }

    Ok(())
}
