//! Implements `get`: print one prompt.

use clap::Parser;

use crate::{command, config::StoreArgs, error::CommandError};

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Key of the prompt (e.g. prompts/agent/system.txt)
    pub key: String,

    /// Fetch this version instead of the latest
    #[arg(long)]
    pub version: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: GetArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    let text = prompts
        .get_prompt(&args.key, args.version.as_deref())
        .await?;
    print!("{text}");
    Ok(())
}
