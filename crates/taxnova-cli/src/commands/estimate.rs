//! Estimate command - deductions, liability and tax due.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use taxnova_core::{ExtractedFinancials, TaxComputationResult, TaxDuePolicy, TaxEstimator};

use super::display::{due_line, estimate_text, financials_text, Palette};
use super::{load_config, read_certificate, OutputFormat, PolicyArg};

/// Arguments for the estimate command.
#[derive(Args)]
pub struct EstimateArgs {
    /// Form 16 PDF to read the figures from
    #[arg(required_unless_present = "taxable_income", conflicts_with = "taxable_income")]
    input: Option<PathBuf>,

    /// Taxable income, instead of reading a PDF (e.g. 8,00,000)
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    taxable_income: Option<Decimal>,

    /// Tax already deducted at source
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    tds: Decimal,

    /// Tax-due policy (default: from config)
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Plain decimal with optional digit-grouping commas and a leading sign.
fn parse_amount(s: &str) -> Result<Decimal, String> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).map_err(|_| format!("not an amount: {s}"))
}

pub async fn run(args: EstimateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let palette = Palette::for_theme(config.ui.theme);
    let policy = args.policy.map(TaxDuePolicy::from).unwrap_or(config.tax.due_policy);

    let financials = match (&args.input, args.taxable_income) {
        (Some(path), _) => read_certificate(path)?.financials,
        (None, Some(taxable_income)) => ExtractedFinancials::new(Decimal::ZERO, args.tds, taxable_income),
        (None, None) => anyhow::bail!("Either a PDF or --taxable-income is required"),
    };

    let result = TaxEstimator::new().with_policy(policy).estimate(&financials);
    info!("{}", due_line(&result));

    let output = match args.format {
        OutputFormat::Json => format!(
            "{}\n",
            serde_json::to_string_pretty(&serde_json::json!({
                "financials": financials,
                "estimate": result,
            }))?
        ),
        OutputFormat::Csv => format_csv(&result)?,
        OutputFormat::Text => {
            let mut text = String::new();
            if args.input.is_some() {
                text.push_str(&financials_text(&financials, &palette));
                text.push('\n');
            }
            text.push_str(&estimate_text(&result, &palette));
            text
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_csv(result: &TaxComputationResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "total_deductions",
        "taxable_income_after_deductions",
        "tax_liability",
        "tax_deducted_at_source",
        "tax_due",
        "policy",
    ])?;
    wtr.write_record([
        result.total_deductions.to_string(),
        result.taxable_income_after_deductions.to_string(),
        result.tax_liability.to_string(),
        result.tax_deducted_at_source.to_string(),
        result.tax_due.to_string(),
        result.policy.to_string(),
    ])?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}
