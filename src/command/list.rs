//! Implements `list`: print prompt keys under a prefix.

use clap::Parser;

use crate::{
    command,
    config::StoreArgs,
    error::CommandError,
    prompt::{DEFAULT_PREFIX, render},
};

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list keys starting with this prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: ListArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    let keys = prompts.list_prompts(&args.prefix).await?;
    println!("{}", render::prompt_list(Ok(keys)));
    Ok(())
}
