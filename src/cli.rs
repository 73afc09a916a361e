//! CLI entry for promptstore: clap subcommands and dispatch to each command handler.
use clap::{Parser, Subcommand};

use crate::{command, error::CommandError};

// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    about = "Versioned prompt storage on S3, served to agents over MCP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands; each one's args and `execute` live in the `command` module.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Serve get_prompt, list_prompts and list_prompt_versions over MCP stdio")]
    Serve(command::serve::ServeArgs),
    #[command(about = "Upload a local prompt directory, creating a new version per file")]
    Upload(command::upload::UploadArgs),
    #[command(about = "Download prompts under a prefix into a local directory")]
    Download(command::download::DownloadArgs),
    #[command(about = "List every version of the prompts under a prefix")]
    ListVersions(command::list_versions::ListVersionsArgs),
    #[command(about = "Make an older version the latest content of a prompt")]
    Rollback(command::rollback::RollbackArgs),
    #[command(about = "Print a prompt, optionally at a specific version")]
    Get(command::get::GetArgs),
    #[command(about = "List prompt keys under a prefix")]
    List(command::list::ListArgs),
    #[command(about = "Check a local prompt directory before uploading")]
    Validate(command::validate::ValidateArgs),
}

/// Parse the command line and run the selected command.
/// - `args`: parse from the process arguments if `None`, otherwise from the given args
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> Result<(), CommandError> {
    parse_async(args).await
}

/// `async` version of [parse]
pub async fn parse_async(args: Option<&[&str]>) -> Result<(), CommandError> {
    let args = match args {
        Some(args) => Cli::try_parse_from(args)?,
        None => Cli::try_parse()?,
    };
    match args.command {
        Commands::Serve(args) => command::serve::execute(args).await,
        Commands::Upload(args) => command::upload::execute(args).await,
        Commands::Download(args) => command::download::execute(args).await,
        Commands::ListVersions(args) => command::list_versions::execute(args).await,
        Commands::Rollback(args) => command::rollback::execute(args).await,
        Commands::Get(args) => command::get::execute(args).await,
        Commands::List(args) => command::list::execute(args).await,
        Commands::Validate(args) => command::validate::execute(args).await,
    }
}

/// this test is to verify that the CLI can be built without panicking
/// according [clap dock](https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_4/index.html)
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert()
}
