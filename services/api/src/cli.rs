use crate::commands::{run_catalog, run_submit, SubmitArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use iac_console::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "IaC Console",
    about = "Validate infrastructure requests and trigger Terraform workflows on GitHub Actions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the supported services and their required fields
    Catalog,
    /// Validate a form and dispatch its workflow
    Submit(SubmitArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog => run_catalog(),
        Command::Submit(args) => run_submit(args).await,
    }
}
