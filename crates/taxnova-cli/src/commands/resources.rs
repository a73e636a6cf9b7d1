//! Resources command - list tax reference links.

use clap::Args;

use super::display::{resources_text, Palette};
use super::{load_config, OutputFormat};

/// Arguments for the resources command.
#[derive(Args)]
pub struct ResourcesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ResourcesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let links = &config.resources.links;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(links)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["title", "url"])?;
            for link in links {
                wtr.write_record([&link.title, &link.url])?;
            }
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => print!("{}", resources_text(links, &Palette::for_theme(config.ui.theme))),
    }

    Ok(())
}
