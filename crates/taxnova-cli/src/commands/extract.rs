//! Extract command - read the figures from a Form 16 PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use taxnova_core::form16::rules::Form16Field;
use taxnova_core::form16::ExtractionResult;

use super::display::{financials_text, Palette};
use super::{load_config, read_certificate, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Form 16 PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show where each figure was found
    #[arg(long)]
    show_matches: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let result = read_certificate(&args.input)?;

    let output = format_extraction(&result, args.format, &Palette::for_theme(config.ui.theme))?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        print!("{}", output);
    }

    if args.show_matches {
        eprintln!();
        for field in Form16Field::ALL {
            match result.matches.get(&field) {
                Some(m) => eprintln!("{} {}: \"{}\"", style("ℹ").blue(), field.label(), m.source),
                None => eprintln!("{} {}: not found", style("⚠").yellow(), field.label()),
            }
        }
        eprintln!("{} Processing time: {}ms", style("ℹ").blue(), result.processing_time_ms);
    }

    Ok(())
}

fn format_extraction(
    result: &ExtractionResult,
    format: OutputFormat,
    palette: &Palette,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&result.financials)?)),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["gross_salary", "tax_deducted_at_source", "taxable_income"])?;
            wtr.write_record([
                result.financials.gross_salary.to_string(),
                result.financials.tax_deducted_at_source.to_string(),
                result.financials.taxable_income.to_string(),
            ])?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(financials_text(&result.financials, palette)),
    }
}
