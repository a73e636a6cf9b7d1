//! Ask command - one question, streamed answer.

use clap::Args;

use super::chat::{open_session, stream_reply};
use super::load_config;

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Question for the assistant
    #[arg(required = true, trailing_var_arg = true)]
    question: Vec<String>,
}

pub async fn run(args: AskArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let question = args.question.join(" ");
    if question.trim().is_empty() {
        anyhow::bail!("Question is empty");
    }

    let config = load_config(config_path)?;
    let (client, mut session) = open_session(&config)?;
    stream_reply(&mut session, &client, &question).await?;

    Ok(())
}
