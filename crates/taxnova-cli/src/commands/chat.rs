//! Chat command - interactive assistant session.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use taxnova_core::UploadAnalysis;
use taxnova_core::export::export_transcript;
use taxnova_core::models::config::TaxnovaConfig;
use taxnova_core::{ChatClient, ChatSession, ReturnFiler, Secrets, SimulatedFiler, TaxEstimator};

use super::display::{estimate_text, financials_text, message_text, receipt_text, resources_text, Palette};
use super::{load_config, read_certificate, spinner};

const HELP: &str = "\
Commands:
  /upload <pdf>     Read a Form 16 and estimate tax
  /file             Auto-fill and file the return (simulation)
  /export [path]    Save the conversation as PDF
  /theme            Toggle light/dark
  /resources        Show tax resource links
  /history          Show the conversation so far
  /help             Show this help
  /quit             Leave the session
Anything else is sent to the assistant.";

/// Arguments for the chat command.
#[derive(Args)]
pub struct ChatArgs {
    /// Form 16 PDF to analyse before the first question
    #[arg(short, long)]
    upload: Option<PathBuf>,

    /// Start in dark theme
    #[arg(long)]
    dark: bool,
}

/// Build a client and a fresh session from configured secrets.
pub fn open_session(config: &TaxnovaConfig) -> anyhow::Result<(ChatClient, ChatSession)> {
    let secrets = Secrets::load(&config.chat)?;
    info!("Chat secrets loaded from {:?}", secrets.source);

    let client = ChatClient::new(&config.chat, secrets.api_key.clone());
    let session = ChatSession::new(
        secrets.chat_context(&config.chat),
        secrets.initial_response(&config.chat),
    )
    .with_theme(config.ui.theme);
    Ok((client, session))
}

/// Send `prompt` and print the reply as it arrives.
pub async fn stream_reply(
    session: &mut ChatSession,
    client: &ChatClient,
    prompt: &str,
) -> anyhow::Result<String> {
    let palette = Palette::for_theme(session.theme());
    let pb = spinner("Thinking...")?;
    let mut started = false;
    let mut stdout = std::io::stdout();

    let result = session
        .respond(client, prompt, |fragment| {
            if !started {
                pb.finish_and_clear();
                started = true;
            }
            print!("{}", palette.assistant.apply_to(fragment));
            let _ = stdout.flush();
        })
        .await;

    pb.finish_and_clear();
    if started {
        println!();
    }
    Ok(result?)
}

pub async fn run(args: ChatArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (client, mut session) = open_session(&config)?;
    if args.dark && !session.theme().is_dark() {
        session.toggle_theme();
    }

    let palette = Palette::for_theme(session.theme());
    println!("{}", palette.heading.apply_to("TaxNova: Your AI-Powered Tax Assistant"));
    println!("{}", palette.muted.apply_to("Type /help for commands."));
    println!();
    for message in session.history() {
        println!("{}", message_text(message, &palette));
    }

    if let Some(path) = &args.upload {
        upload(&mut session, &config, path);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", Palette::for_theme(session.theme()).user.apply_to("›"));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let palette = Palette::for_theme(session.theme());

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/upload" if rest.is_empty() => eprintln!("{} Usage: /upload <pdf>", style("⚠").yellow()),
            "/upload" => upload(&mut session, &config, Path::new(rest)),
            "/file" => match session.analysis() {
                Some(analysis) => {
                    let receipt = SimulatedFiler::new(config.filing.clone()).file(&analysis.financials);
                    print!("{}", receipt_text(&receipt, &palette));
                }
                None => eprintln!("{} Upload a Form 16 first.", style("⚠").yellow()),
            },
            "/export" => {
                let path = if rest.is_empty() {
                    config.export.file_name.clone()
                } else {
                    PathBuf::from(rest)
                };
                match export_transcript(&config.export.title, session.history(), &path) {
                    Ok(()) => println!("{} Chat exported to {}", style("✓").green(), path.display()),
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        eprintln!("{} Export failed: {}", style("⚠").yellow(), e);
                    }
                }
            }
            "/theme" => {
                let theme = session.toggle_theme();
                println!("{}", Palette::for_theme(theme).muted.apply_to(format!("Theme: {theme}")));
            }
            "/resources" => print!("{}", resources_text(&config.resources.links, &palette)),
            "/history" => {
                for message in session.history() {
                    println!("{}", message_text(message, &palette));
                }
            }
            _ if command.starts_with('/') => {
                eprintln!("{} Unknown command {}. Type /help.", style("⚠").yellow(), command)
            }
            _ => {
                if let Err(e) = stream_reply(&mut session, &client, line).await {
                    warn!("Chat request failed: {}", e);
                    eprintln!("{} {}", style("✗").red(), e);
                }
            }
        }
    }

    Ok(())
}

/// Analyse a certificate and keep the result on the session.
fn upload(session: &mut ChatSession, config: &TaxnovaConfig, path: &Path) {
    let palette = Palette::for_theme(session.theme());
    match read_certificate(path) {
        Ok(result) => {
            let computation = TaxEstimator::new()
                .with_policy(config.tax.due_policy)
                .estimate(&result.financials);
            print!("{}", financials_text(&result.financials, &palette));
            println!();
            print!("{}", estimate_text(&computation, &palette));
            session.record_upload(UploadAnalysis {
                financials: result.financials,
                computation,
            });
        }
        Err(e) => {
            warn!("Upload failed: {}", e);
            eprintln!("{} {}", style("✗").red(), e);
        }
    }
}
